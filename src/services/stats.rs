//! Dashboard statistics service

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::claims::UserClaims, repository::Repository};

/// One status bucket with its count
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Aggregated dashboard numbers
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub active_employees: i64,
    pub on_leave_today: i64,
    pub email_applications: Vec<StatusCount>,
    pub loan_applications: Vec<StatusCount>,
    pub equipment: Vec<StatusCount>,
    pub loans_outstanding: i64,
    pub loans_overdue: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn overview(&self, claims: &UserClaims) -> AppResult<StatsResponse> {
        claims.require_read_applications()?;

        let now = Utc::now();
        let active_employees = self.repository.employees.count_active().await?;
        let on_leave_today = self
            .repository
            .leave_requests
            .count_on_leave(now.date_naive())
            .await?;
        let email_applications = Self::buckets(
            self.repository.email_applications.counts_by_status().await?,
        );
        let loan_applications = Self::buckets(
            self.repository.loan_applications.counts_by_status().await?,
        );
        let equipment = Self::buckets(self.repository.equipment.counts_by_availability().await?);
        let loans_outstanding = self.repository.loan_transactions.count_outstanding().await?;
        let loans_overdue = self.repository.loan_transactions.count_overdue(now).await?;

        Ok(StatsResponse {
            active_employees,
            on_leave_today,
            email_applications,
            loan_applications,
            equipment,
            loans_outstanding,
            loans_overdue,
        })
    }

    fn buckets(rows: Vec<(String, i64)>) -> Vec<StatusCount> {
        rows.into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect()
    }
}
