//! Repository layer for database operations

pub mod approvals;
pub mod email_applications;
pub mod employees;
pub mod equipment;
pub mod leave_requests;
pub mod loan_applications;
pub mod loan_transactions;

use sqlx::{Pool, Postgres};

/// Database transaction handle used by multi-row units of work
pub type PgTx<'a> = sqlx::Transaction<'a, Postgres>;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub employees: employees::EmployeesRepository,
    pub equipment: equipment::EquipmentRepository,
    pub email_applications: email_applications::EmailApplicationsRepository,
    pub loan_applications: loan_applications::LoanApplicationsRepository,
    pub approvals: approvals::ApprovalsRepository,
    pub loan_transactions: loan_transactions::LoanTransactionsRepository,
    pub leave_requests: leave_requests::LeaveRequestsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            employees: employees::EmployeesRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            email_applications: email_applications::EmailApplicationsRepository::new(pool.clone()),
            loan_applications: loan_applications::LoanApplicationsRepository::new(pool.clone()),
            approvals: approvals::ApprovalsRepository::new(pool.clone()),
            loan_transactions: loan_transactions::LoanTransactionsRepository::new(pool.clone()),
            leave_requests: leave_requests::LeaveRequestsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a unit of work spanning several rows
    pub async fn begin(&self) -> crate::error::AppResult<PgTx<'static>> {
        Ok(self.pool.begin().await?)
    }

    /// Connectivity probe for the readiness endpoint
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
