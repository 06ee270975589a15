//! Loan applications repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use super::PgTx;
use crate::{
    error::{AppError, AppResult},
    models::loan_application::{
        LoanApplication, LoanApplicationDraft, LoanApplicationItem, LoanItemInput,
        SubmitLoanApplication,
    },
    workflow::ApplicationStatus,
};

#[derive(Clone)]
pub struct LoanApplicationsRepository {
    pool: Pool<Postgres>,
}

impl LoanApplicationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get application by ID (soft-deleted records are not found)
    pub async fn get_by_id(&self, id: i32) -> AppResult<LoanApplication> {
        sqlx::query_as::<_, LoanApplication>(
            "SELECT * FROM loan_applications WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan application {} not found", id)))
    }

    /// Row-locked read for state transitions
    pub async fn get_for_update(&self, tx: &mut PgTx<'_>, id: i32) -> AppResult<LoanApplication> {
        sqlx::query_as::<_, LoanApplication>(
            "SELECT * FROM loan_applications WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan application {} not found", id)))
    }

    /// List applications, optionally restricted to one applicant or status
    pub async fn list(
        &self,
        employee_id: Option<i32>,
        status: Option<ApplicationStatus>,
    ) -> AppResult<Vec<LoanApplication>> {
        let rows = sqlx::query_as::<_, LoanApplication>(
            r#"
            SELECT * FROM loan_applications
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

    /// Item lines of one application
    pub async fn items_for(&self, application_id: i32) -> AppResult<Vec<LoanApplicationItem>> {
        let rows = sqlx::query_as::<_, LoanApplicationItem>(
            "SELECT * FROM loan_application_items WHERE loan_application_id = $1 ORDER BY id",
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a new draft with its item lines
    pub async fn create_draft(
        &self,
        employee_id: i32,
        draft: &LoanApplicationDraft,
        created_by: i32,
    ) -> AppResult<LoanApplication> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, LoanApplication>(
            r#"
            INSERT INTO loan_applications
                (employee_id, status, purpose, location, loan_start_date, loan_end_date,
                 supporting_officer_id, responsible_officer_id, created_by, updated_by)
            VALUES ($1, 'draft', $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(&draft.purpose)
        .bind(&draft.location)
        .bind(draft.loan_start_date)
        .bind(draft.loan_end_date)
        .bind(draft.supporting_officer_id)
        .bind(draft.responsible_officer_id)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_items(&mut tx, row.id, &draft.items).await?;
        tx.commit().await?;

        Ok(row)
    }

    /// Replace all item lines while the application is a draft
    pub async fn update_draft(
        &self,
        id: i32,
        draft: &LoanApplicationDraft,
        updated_by: i32,
    ) -> AppResult<Option<LoanApplication>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, LoanApplication>(
            r#"
            UPDATE loan_applications SET
                purpose = $2,
                location = $3,
                loan_start_date = $4,
                loan_end_date = $5,
                supporting_officer_id = $6,
                responsible_officer_id = $7,
                updated_by = $8,
                updated_at = NOW()
            WHERE id = $1 AND status = 'draft' AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.purpose)
        .bind(&draft.location)
        .bind(draft.loan_start_date)
        .bind(draft.loan_end_date)
        .bind(draft.supporting_officer_id)
        .bind(draft.responsible_officer_id)
        .bind(updated_by)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM loan_application_items WHERE loan_application_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_items(&mut tx, id, &draft.items).await?;
        tx.commit().await?;

        Ok(Some(row))
    }

    /// Persist final field values, replace item lines and move draft ->
    /// pending_support, inside the submission unit of work
    pub async fn submit(
        &self,
        tx: &mut PgTx<'_>,
        id: i32,
        payload: &SubmitLoanApplication,
        items: &[LoanItemInput],
        confirmed_at: DateTime<Utc>,
        updated_by: i32,
    ) -> AppResult<Option<LoanApplication>> {
        let row = sqlx::query_as::<_, LoanApplication>(
            r#"
            UPDATE loan_applications SET
                status = 'pending_support',
                purpose = $2,
                location = $3,
                loan_start_date = $4,
                loan_end_date = $5,
                supporting_officer_id = $6,
                responsible_officer_id = $7,
                applicant_confirmation_timestamp = $8,
                updated_by = $9,
                updated_at = NOW()
            WHERE id = $1 AND status = 'draft' AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.purpose)
        .bind(&payload.location)
        .bind(payload.loan_start_date)
        .bind(payload.loan_end_date)
        .bind(payload.supporting_officer_id)
        .bind(payload.responsible_officer_id)
        .bind(confirmed_at)
        .bind(updated_by)
        .fetch_optional(&mut **tx)
        .await?;

        if row.is_none() {
            return Ok(None);
        }

        sqlx::query("DELETE FROM loan_application_items WHERE loan_application_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Self::insert_items(tx, id, items).await?;

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
            UPDATE loan_applications
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
            UPDATE loan_applications
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

    /// Record approved quantities on item lines at decision time
    pub async fn approve_quantities(
        &self,
        tx: &mut PgTx<'_>,
        application_id: i32,
    ) -> AppResult<()> {
        // Default policy: grant what was requested unless an officer
        // recorded a different figure earlier.
        sqlx::query(
            r#"
            UPDATE loan_application_items
            SET quantity_approved = COALESCE(quantity_approved, quantity_requested)
            WHERE loan_application_id = $1
            "#,
        )
        .bind(application_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Move issued applications past their end date to overdue; returns the
    /// affected ids
    pub async fn flag_overdue(&self, as_of: DateTime<Utc>) -> AppResult<Vec<i32>> {
        let rows: Vec<(i32,)> = sqlx::query_as(
            r#"
            UPDATE loan_applications
            SET status = 'overdue', updated_at = NOW()
            WHERE status = 'issued' AND loan_end_date < $1 AND deleted_at IS NULL
            RETURNING id
            "#,
        )
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Soft-delete a draft
    pub async fn soft_delete(&self, id: i32, deleted_by: i32) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE loan_applications
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
            SELECT status, COUNT(*) FROM loan_applications
            WHERE deleted_at IS NULL
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_items(
        tx: &mut PgTx<'_>,
        application_id: i32,
        items: &[LoanItemInput],
    ) -> AppResult<()> {
        for item in items {
            sqlx::query(
                r#"
                INSERT INTO loan_application_items
                    (loan_application_id, equipment_type, quantity_requested, notes)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(application_id)
            .bind(&item.equipment_type)
            .bind(item.quantity_requested)
            .bind(&item.notes)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
