//! Loan transactions repository for database operations

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Pool, Postgres};

use super::PgTx;
use crate::{
    error::{AppError, AppResult},
    models::enums::TransactionStatus,
    models::loan_transaction::LoanTransaction,
};

#[derive(Clone)]
pub struct LoanTransactionsRepository {
    pool: Pool<Postgres>,
}

impl LoanTransactionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get transaction by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<LoanTransaction> {
        sqlx::query_as::<_, LoanTransaction>("SELECT * FROM loan_transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan transaction {} not found", id)))
    }

    /// Row-locked read for the return path
    pub async fn get_for_update(&self, tx: &mut PgTx<'_>, id: i32) -> AppResult<LoanTransaction> {
        sqlx::query_as::<_, LoanTransaction>(
            "SELECT * FROM loan_transactions WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan transaction {} not found", id)))
    }

    /// All hand-offs of one application, oldest first
    pub async fn list_for_application(&self, application_id: i32) -> AppResult<Vec<LoanTransaction>> {
        let rows = sqlx::query_as::<_, LoanTransaction>(
            "SELECT * FROM loan_transactions WHERE loan_application_id = $1 ORDER BY issue_timestamp, id",
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Record an issuance inside the issuance unit of work
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_issue(
        &self,
        tx: &mut PgTx<'_>,
        application_id: i32,
        equipment_id: i32,
        issuing_officer_id: i32,
        receiving_officer_id: Option<i32>,
        accessories: Option<Vec<String>>,
        notes: Option<&str>,
        issued_at: DateTime<Utc>,
    ) -> AppResult<LoanTransaction> {
        let row = sqlx::query_as::<_, LoanTransaction>(
            r#"
            INSERT INTO loan_transactions
                (loan_application_id, equipment_id, status, issuing_officer_id,
                 receiving_officer_id, issue_timestamp, accessories_on_issue, issue_notes)
            VALUES ($1, $2, 'issued', $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(application_id)
        .bind(equipment_id)
        .bind(issuing_officer_id)
        .bind(receiving_officer_id)
        .bind(issued_at)
        .bind(accessories.map(Json))
        .bind(notes)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row)
    }

    /// Complete a return inside the return unit of work.
    ///
    /// Compare-and-swap on status = 'issued' with no return recorded yet;
    /// None means the transaction was already closed.
    #[allow(clippy::too_many_arguments)]
    pub async fn complete_return(
        &self,
        tx: &mut PgTx<'_>,
        id: i32,
        return_status: TransactionStatus,
        returning_officer_id: Option<i32>,
        accepting_officer_id: i32,
        accessories: Option<Vec<String>>,
        notes: Option<&str>,
        returned_at: DateTime<Utc>,
    ) -> AppResult<Option<LoanTransaction>> {
        let row = sqlx::query_as::<_, LoanTransaction>(
            r#"
            UPDATE loan_transactions SET
                status = $2,
                returning_officer_id = $3,
                accepting_officer_id = $4,
                return_timestamp = $5,
                accessories_on_return = $6,
                return_notes = $7
            WHERE id = $1 AND status = 'issued' AND return_timestamp IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(return_status.as_str())
        .bind(returning_officer_id)
        .bind(accepting_officer_id)
        .bind(returned_at)
        .bind(accessories.map(Json))
        .bind(notes)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row)
    }

    /// Outstanding hand-offs of an application, excluding one transaction
    pub async fn count_other_outstanding(
        &self,
        tx: &mut PgTx<'_>,
        application_id: i32,
        excluding_id: i32,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM loan_transactions
            WHERE loan_application_id = $1 AND id != $2 AND return_timestamp IS NULL
            "#,
        )
        .bind(application_id)
        .bind(excluding_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(count)
    }

    /// Count open hand-offs (for stats)
    pub async fn count_outstanding(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loan_transactions WHERE return_timestamp IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count open hand-offs past their application's end date (for stats)
    pub async fn count_overdue(&self, as_of: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM loan_transactions t
            JOIN loan_applications a ON a.id = t.loan_application_id
            WHERE t.return_timestamp IS NULL AND a.loan_end_date < $1
            "#,
        )
        .bind(as_of)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
