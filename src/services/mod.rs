//! Business logic services

pub mod approvals;
pub mod email_applications;
pub mod employees;
pub mod equipment;
pub mod issuance;
pub mod leave;
pub mod loan_applications;
pub mod notify;
pub mod provisioning;
pub mod stats;

use std::sync::Arc;

use crate::{
    config::{EmailConfig, ProvisioningConfig},
    error::AppResult,
    repository::Repository,
};

use provisioning::{HttpMailboxProvisioner, MailboxProvisioner};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub employees: employees::EmployeesService,
    pub equipment: equipment::EquipmentService,
    pub email_applications: email_applications::EmailApplicationsService,
    pub loan_applications: loan_applications::LoanApplicationsService,
    pub approvals: approvals::ApprovalsService,
    pub issuance: issuance::IssuanceService,
    pub leave: leave::LeaveService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        email_config: EmailConfig,
        provisioning_config: ProvisioningConfig,
    ) -> AppResult<Self> {
        let notify = notify::NotifyService::new(email_config);
        let provisioner: Arc<dyn MailboxProvisioner> =
            Arc::new(HttpMailboxProvisioner::new(provisioning_config)?);

        Ok(Self {
            employees: employees::EmployeesService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            email_applications: email_applications::EmailApplicationsService::new(
                repository.clone(),
                notify.clone(),
                provisioner,
            ),
            loan_applications: loan_applications::LoanApplicationsService::new(
                repository.clone(),
                notify.clone(),
            ),
            approvals: approvals::ApprovalsService::new(repository.clone(), notify),
            issuance: issuance::IssuanceService::new(repository.clone()),
            leave: leave::LeaveService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        })
    }
}
