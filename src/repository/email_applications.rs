//! Email applications repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use super::PgTx;
use crate::{
    error::{AppError, AppResult},
    models::email_application::{EmailApplication, EmailApplicationDraft, SubmitEmailApplication},
    workflow::ApplicationStatus,
};

#[derive(Clone)]
pub struct EmailApplicationsRepository {
    pool: Pool<Postgres>,
}

impl EmailApplicationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get application by ID (soft-deleted records are not found)
    pub async fn get_by_id(&self, id: i32) -> AppResult<EmailApplication> {
        sqlx::query_as::<_, EmailApplication>(
            "SELECT * FROM email_applications WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Email application {} not found", id)))
    }

    /// Row-locked read for state transitions
    pub async fn get_for_update(&self, tx: &mut PgTx<'_>, id: i32) -> AppResult<EmailApplication> {
        sqlx::query_as::<_, EmailApplication>(
            "SELECT * FROM email_applications WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Email application {} not found", id)))
    }

    /// List applications, optionally restricted to one applicant or status
    pub async fn list(
        &self,
        employee_id: Option<i32>,
        status: Option<ApplicationStatus>,
    ) -> AppResult<Vec<EmailApplication>> {
        let rows = sqlx::query_as::<_, EmailApplication>(
            r#"
            SELECT * FROM email_applications
            WHERE deleted_at IS NULL
              AND ($1::int IS NULL OR employee_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(employee_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a new draft owned by the given employee
    pub async fn create_draft(
        &self,
        employee_id: i32,
        draft: &EmailApplicationDraft,
        created_by: i32,
    ) -> AppResult<EmailApplication> {
        let row = sqlx::query_as::<_, EmailApplication>(
            r#"
            INSERT INTO email_applications
                (employee_id, status, purpose, service_status, proposed_email,
                 group_email, group_contact_name, group_contact_email,
                 supporting_officer_id, created_by, updated_by)
            VALUES ($1, 'draft', $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(&draft.purpose)
        .bind(draft.service_status.map(|s| s.as_str()))
        .bind(&draft.proposed_email)
        .bind(&draft.group_email)
        .bind(&draft.group_contact_name)
        .bind(&draft.group_contact_email)
        .bind(draft.supporting_officer_id)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Overwrite mutable fields while the application is still a draft.
    ///
    /// The status guard is part of the WHERE clause; None means the record
    /// was not in draft state anymore (or vanished) and the caller decides.
    pub async fn update_draft(
        &self,
        id: i32,
        draft: &EmailApplicationDraft,
        updated_by: i32,
    ) -> AppResult<Option<EmailApplication>> {
        let row = sqlx::query_as::<_, EmailApplication>(
            r#"
            UPDATE email_applications SET
                purpose = $2,
                service_status = $3,
                proposed_email = $4,
                group_email = $5,
                group_contact_name = $6,
                group_contact_email = $7,
                supporting_officer_id = $8,
                updated_by = $9,
                updated_at = NOW()
            WHERE id = $1 AND status = 'draft' AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.purpose)
        .bind(draft.service_status.map(|s| s.as_str()))
        .bind(&draft.proposed_email)
        .bind(&draft.group_email)
        .bind(&draft.group_contact_name)
        .bind(&draft.group_contact_email)
        .bind(draft.supporting_officer_id)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Persist final field values and move draft -> pending_support, inside
    /// the submission unit of work
    pub async fn submit(
        &self,
        tx: &mut PgTx<'_>,
        id: i32,
        payload: &SubmitEmailApplication,
        certified_at: DateTime<Utc>,
        updated_by: i32,
    ) -> AppResult<Option<EmailApplication>> {
        let row = sqlx::query_as::<_, EmailApplication>(
            r#"
            UPDATE email_applications SET
                status = 'pending_support',
                purpose = $2,
                service_status = $3,
                proposed_email = $4,
                group_email = $5,
                group_contact_name = $6,
                group_contact_email = $7,
                supporting_officer_id = $8,
                certification_accepted = TRUE,
                certification_timestamp = $9,
                updated_by = $10,
                updated_at = NOW()
            WHERE id = $1 AND status = 'draft' AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.purpose)
        .bind(payload.service_status.map(|s| s.as_str()))
        .bind(&payload.proposed_email)
        .bind(&payload.group_email)
        .bind(&payload.group_contact_name)
        .bind(&payload.group_contact_email)
        .bind(payload.supporting_officer_id)
        .bind(certified_at)
        .bind(updated_by)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row)
    }

    /// Compare-and-swap status transition inside a unit of work
    pub async fn transition_status(
        &self,
        tx: &mut PgTx<'_>,
        id: i32,
        from: ApplicationStatus,
        to: ApplicationStatus,
        updated_by: i32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE email_applications
            SET status = $3, updated_by = $4, updated_at = NOW()
            WHERE id = $1 AND status = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(updated_by)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Terminal rejection, storing the officer's comments as the reason
    pub async fn reject(
        &self,
        tx: &mut PgTx<'_>,
        id: i32,
        from: ApplicationStatus,
        reason: Option<&str>,
        updated_by: i32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE email_applications
            SET status = 'rejected', rejection_reason = $3, updated_by = $4, updated_at = NOW()
            WHERE id = $1 AND status = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(reason)
        .bind(updated_by)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Record the provisioning outcome for an approved application
    pub async fn record_provision_outcome(
        &self,
        id: i32,
        to: ApplicationStatus,
        assigned_email: Option<&str>,
        failure_reason: Option<&str>,
        updated_by: i32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE email_applications
            SET status = $2,
                final_assigned_email = COALESCE($3, final_assigned_email),
                rejection_reason = COALESCE($4, rejection_reason),
                updated_by = $5,
                updated_at = NOW()
            WHERE id = $1 AND status = 'approved' AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(to.as_str())
        .bind(assigned_email)
        .bind(failure_reason)
        .bind(updated_by)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Soft-delete a draft
    pub async fn soft_delete(&self, id: i32, deleted_by: i32) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE email_applications
            SET deleted_at = NOW(), deleted_by = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'draft' AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(deleted_by)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Count applications per status (for stats)
    pub async fn counts_by_status(&self) -> AppResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT status, COUNT(*) FROM email_applications
            WHERE deleted_at IS NULL
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
