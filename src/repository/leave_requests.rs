//! Leave requests repository for database operations

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::enums::LeaveStatus,
    models::leave_request::{CreateLeaveRequest, LeaveRequest},
    workflow::ApprovalDecision,
};

#[derive(Clone)]
pub struct LeaveRequestsRepository {
    pool: Pool<Postgres>,
}

impl LeaveRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get leave request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<LeaveRequest> {
        sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Leave request {} not found", id)))
    }

    /// List requests, optionally restricted to one employee or status
    pub async fn list(
        &self,
        employee_id: Option<i32>,
        status: Option<LeaveStatus>,
    ) -> AppResult<Vec<LeaveRequest>> {
        let rows = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT * FROM leave_requests
            WHERE ($1::int IS NULL OR employee_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY start_date DESC, id DESC
            "#,
        )
        .bind(employee_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a pending leave request
    pub async fn create(
        &self,
        employee_id: i32,
        data: &CreateLeaveRequest,
    ) -> AppResult<LeaveRequest> {
        let row = sqlx::query_as::<_, LeaveRequest>(
            r#"
            INSERT INTO leave_requests
                (employee_id, leave_type, start_date, end_date, start_time, end_time, reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(data.leave_type.as_str())
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(&data.reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Record an officer decision; compare-and-swap on status = 'pending'
    pub async fn decide(
        &self,
        id: i32,
        decision: ApprovalDecision,
        decided_by: i32,
        note: Option<&str>,
        decided_at: DateTime<Utc>,
    ) -> AppResult<Option<LeaveRequest>> {
        let row = sqlx::query_as::<_, LeaveRequest>(
            r#"
            UPDATE leave_requests SET
                status = $2,
                decided_by = $3,
                decision_note = $4,
                decided_at = $5,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(decision.as_str())
        .bind(decided_by)
        .bind(note)
        .bind(decided_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Cancel a pending request; compare-and-swap on status = 'pending'
    pub async fn cancel(&self, id: i32) -> AppResult<Option<LeaveRequest>> {
        let row = sqlx::query_as::<_, LeaveRequest>(
            r#"
            UPDATE leave_requests SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Count employees on approved leave covering the given day (for stats)
    pub async fn count_on_leave(&self, day: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT employee_id) FROM leave_requests
            WHERE status = 'approved' AND start_date <= $1 AND end_date >= $1
            "#,
        )
        .bind(day)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
