//! Email application service (draft, submit, cancel, provision)

use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::approval::Approvable,
    models::claims::UserClaims,
    models::email_application::{
        validate_email_submission, EmailApplication, EmailApplicationDraft, SubmitEmailApplication,
    },
    repository::Repository,
    workflow::{self, ApplicationKind, ApplicationStatus},
};

use super::notify::NotifyService;
use super::provisioning::{MailboxProvisioner, ProvisionRequest};

#[derive(Clone)]
pub struct EmailApplicationsService {
    repository: Repository,
    notify: NotifyService,
    provisioner: Arc<dyn MailboxProvisioner>,
}

impl EmailApplicationsService {
    pub fn new(
        repository: Repository,
        notify: NotifyService,
        provisioner: Arc<dyn MailboxProvisioner>,
    ) -> Self {
        Self {
            repository,
            notify,
            provisioner,
        }
    }

    /// Applications visible to the caller: their own, or everyone's for
    /// officers and admins
    pub async fn list(
        &self,
        claims: &UserClaims,
        status: Option<ApplicationStatus>,
        all: bool,
    ) -> AppResult<Vec<EmailApplication>> {
        claims.require_read_applications()?;
        let employee_id = if all && self.can_see_all(claims) {
            None
        } else {
            Some(claims.employee_id)
        };
        self.repository.email_applications.list(employee_id, status).await
    }

    pub async fn get(&self, id: i32, claims: &UserClaims) -> AppResult<EmailApplication> {
        claims.require_read_applications()?;
        let application = self.repository.email_applications.get_by_id(id).await?;
        self.require_visible(&application, claims)?;
        Ok(application)
    }

    /// Create a new draft owned by the caller
    pub async fn create_draft(
        &self,
        claims: &UserClaims,
        draft: &EmailApplicationDraft,
    ) -> AppResult<EmailApplication> {
        claims.require_write_applications()?;
        // The applicant must exist as an employee record
        self.repository.employees.get_by_id(claims.employee_id).await?;
        self.repository
            .email_applications
            .create_draft(claims.employee_id, draft, claims.employee_id)
            .await
    }

    /// Overwrite mutable fields; only drafts are editable
    pub async fn update_draft(
        &self,
        id: i32,
        claims: &UserClaims,
        draft: &EmailApplicationDraft,
    ) -> AppResult<EmailApplication> {
        claims.require_write_applications()?;
        let application = self.repository.email_applications.get_by_id(id).await?;
        self.require_owner(&application, claims)?;

        self.repository
            .email_applications
            .update_draft(id, draft, claims.employee_id)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(format!(
                    "Application {} is no longer a draft and cannot be edited",
                    id
                ))
            })
    }

    /// Strictly validate and submit a draft into the approval workflow.
    ///
    /// Field persistence, the status change and the first pending approval
    /// are one unit of work.
    pub async fn submit(
        &self,
        id: i32,
        claims: &UserClaims,
        payload: &SubmitEmailApplication,
    ) -> AppResult<EmailApplication> {
        claims.require_write_applications()?;
        let application = self.repository.email_applications.get_by_id(id).await?;
        self.require_owner(&application, claims)?;

        validate_email_submission(payload)?;

        // The supporting officer must be a live employee record
        let officer_id = payload.supporting_officer_id.ok_or_else(|| {
            AppError::Validation("supporting_officer_id: A supporting officer must be selected".to_string())
        })?;
        let officer = self.repository.employees.get_by_id(officer_id).await?;

        let now = Utc::now();
        let mut tx = self.repository.begin().await?;

        let submitted = self
            .repository
            .email_applications
            .submit(&mut tx, id, payload, now, claims.employee_id)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(format!("Application {} has already been submitted", id))
            })?;

        self.repository
            .approvals
            .insert_pending(
                &mut tx,
                Approvable::Email(id),
                workflow::first_stage(ApplicationKind::Email),
                Some(officer_id),
            )
            .await?;

        tx.commit().await?;

        // Post-commit notice; failures never undo the submission
        if let Some(address) = officer.work_email.as_deref() {
            if let Ok(applicant) = self.repository.employees.get_by_id(submitted.employee_id).await {
                let applicant_name = format!("{} {}", applicant.firstname, applicant.lastname);
                if let Err(e) = self
                    .notify
                    .application_submitted(address, ApplicationKind::Email, id, &applicant_name)
                    .await
                {
                    tracing::warn!("Submission notice failed: {}", e);
                }
            }
        }

        Ok(submitted)
    }

    /// Cancel an application before any decision was made
    pub async fn cancel(&self, id: i32, claims: &UserClaims) -> AppResult<EmailApplication> {
        claims.require_write_applications()?;

        let mut tx = self.repository.begin().await?;
        let application = self.repository.email_applications.get_for_update(&mut tx, id).await?;
        self.require_owner(&application, claims)?;

        let status = application.workflow_status()?;
        if !status.can_cancel() {
            return Err(AppError::InvalidState(format!(
                "Application {} can no longer be cancelled (status {})",
                id, status
            )));
        }

        let moved = self
            .repository
            .email_applications
            .transition_status(&mut tx, id, status, ApplicationStatus::Cancelled, claims.employee_id)
            .await?;
        if !moved {
            return Err(AppError::InvalidState(format!(
                "Application {} changed state during cancellation",
                id
            )));
        }
        self.repository
            .approvals
            .cancel_pending(&mut tx, Approvable::Email(id))
            .await?;
        tx.commit().await?;

        self.repository.email_applications.get_by_id(id).await
    }

    /// Soft-delete an abandoned draft
    pub async fn delete_draft(&self, id: i32, claims: &UserClaims) -> AppResult<()> {
        claims.require_write_applications()?;
        let application = self.repository.email_applications.get_by_id(id).await?;
        self.require_owner(&application, claims)?;

        if self
            .repository
            .email_applications
            .soft_delete(id, claims.employee_id)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::InvalidState(format!(
                "Only drafts can be deleted; application {} has been submitted",
                id
            )))
        }
    }

    /// Run provisioning for an approved application and record the outcome.
    ///
    /// The gateway call happens outside any database transaction; the
    /// outcome write re-checks that the application is still approved.
    pub async fn provision(&self, id: i32, claims: &UserClaims) -> AppResult<EmailApplication> {
        claims.require_admin()?;

        let application = self.repository.email_applications.get_by_id(id).await?;
        let status = application.workflow_status()?;
        if status != ApplicationStatus::Approved {
            return Err(AppError::InvalidState(format!(
                "Application {} is not approved (status {})",
                id, status
            )));
        }

        let group = application.proposed_email.is_none();
        let mailbox = application
            .proposed_email
            .clone()
            .or_else(|| application.group_email.clone())
            .ok_or_else(|| {
                AppError::Internal(format!("Approved application {} has no requested address", id))
            })?;
        let display_name = application
            .group_contact_name
            .clone()
            .unwrap_or_else(|| format!("Employee #{}", application.employee_id));

        let request = ProvisionRequest {
            application_id: id,
            mailbox,
            display_name,
            group,
        };

        let (to, assigned, failure) = match self.provisioner.provision(&request).await {
            Ok(result) => (ApplicationStatus::Completed, Some(result.address), None),
            Err(e) => {
                tracing::warn!("Provisioning failed for application {}: {}", id, e);
                (ApplicationStatus::ProvisionFailed, None, Some(e.to_string()))
            }
        };

        let recorded = self
            .repository
            .email_applications
            .record_provision_outcome(
                id,
                to,
                assigned.as_deref(),
                failure.as_deref(),
                claims.employee_id,
            )
            .await?;
        if !recorded {
            return Err(AppError::InvalidState(format!(
                "Application {} changed state while provisioning was in flight",
                id
            )));
        }

        if let Some(address) = assigned.as_deref() {
            if let Ok(applicant) = self.repository.employees.get_by_id(application.employee_id).await {
                if let Some(to_addr) = applicant.work_email.as_deref() {
                    if let Err(e) = self.notify.mailbox_ready(to_addr, address).await {
                        tracing::warn!("Mailbox-ready notice failed: {}", e);
                    }
                }
            }
        }

        self.repository.email_applications.get_by_id(id).await
    }

    fn can_see_all(&self, claims: &UserClaims) -> bool {
        claims.is_admin || claims.require_approvals().is_ok()
    }

    fn require_visible(&self, application: &EmailApplication, claims: &UserClaims) -> AppResult<()> {
        if application.employee_id == claims.employee_id || self.can_see_all(claims) {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "You may only view your own applications".to_string(),
            ))
        }
    }

    fn require_owner(&self, application: &EmailApplication, claims: &UserClaims) -> AppResult<()> {
        if application.employee_id == claims.employee_id {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only the applicant may modify this application".to_string(),
            ))
        }
    }
}
