//! Approvals repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use super::PgTx;
use crate::{
    error::AppResult,
    models::approval::{Approvable, Approval},
    workflow::{ApprovalDecision, Stage},
};

#[derive(Clone)]
pub struct ApprovalsRepository {
    pool: Pool<Postgres>,
}

impl ApprovalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Approval history of one application, oldest first
    pub async fn list_for(&self, approvable: Approvable) -> AppResult<Vec<Approval>> {
        let rows = sqlx::query_as::<_, Approval>(
            r#"
            SELECT * FROM approvals
            WHERE approvable_type = $1 AND approvable_id = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(approvable.type_tag())
        .bind(approvable.id())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Open a pending decision task for a stage.
    ///
    /// officer_id None leaves the task unassigned; the partial unique index
    /// guarantees at most one pending task per (application, stage).
    pub async fn insert_pending(
        &self,
        tx: &mut PgTx<'_>,
        approvable: Approvable,
        stage: Stage,
        officer_id: Option<i32>,
    ) -> AppResult<Approval> {
        let row = sqlx::query_as::<_, Approval>(
            r#"
            INSERT INTO approvals (approvable_type, approvable_id, stage, officer_id, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING *
            "#,
        )
        .bind(approvable.type_tag())
        .bind(approvable.id())
        .bind(stage.as_str())
        .bind(officer_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row)
    }

    /// Row-locked read of the open task for a stage, if any
    pub async fn get_pending_for_stage(
        &self,
        tx: &mut PgTx<'_>,
        approvable: Approvable,
        stage: Stage,
    ) -> AppResult<Option<Approval>> {
        let row = sqlx::query_as::<_, Approval>(
            r#"
            SELECT * FROM approvals
            WHERE approvable_type = $1 AND approvable_id = $2 AND stage = $3
              AND status = 'pending'
            FOR UPDATE
            "#,
        )
        .bind(approvable.type_tag())
        .bind(approvable.id())
        .bind(stage.as_str())
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row)
    }

    /// Close any open tasks when an application is cancelled
    pub async fn cancel_pending(
        &self,
        tx: &mut PgTx<'_>,
        approvable: Approvable,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE approvals SET status = 'cancelled', updated_at = NOW()
            WHERE approvable_type = $1 AND approvable_id = $2 AND status = 'pending'
            "#,
        )
        .bind(approvable.type_tag())
        .bind(approvable.id())
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Complete the pending task for a stage with the officer's decision.
    ///
    /// Compare-and-swap on status = 'pending'; None means no open task was
    /// found (already decided or never created) and the caller reports
    /// `InvalidState`.
    pub async fn complete_pending(
        &self,
        tx: &mut PgTx<'_>,
        approvable: Approvable,
        stage: Stage,
        officer_id: i32,
        decision: ApprovalDecision,
        comments: Option<&str>,
        decided_at: DateTime<Utc>,
    ) -> AppResult<Option<Approval>> {
        let row = sqlx::query_as::<_, Approval>(
            r#"
            UPDATE approvals SET
                officer_id = $4,
                status = $5,
                comments = $6,
                approval_timestamp = $7,
                updated_at = NOW()
            WHERE approvable_type = $1 AND approvable_id = $2 AND stage = $3
              AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(approvable.type_tag())
        .bind(approvable.id())
        .bind(stage.as_str())
        .bind(officer_id)
        .bind(decision.as_str())
        .bind(comments)
        .bind(decided_at)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row)
    }

    /// Pending decision tasks assigned to (or claimable by) an officer
    pub async fn pending_for_officer(&self, officer_id: i32) -> AppResult<Vec<Approval>> {
        let rows = sqlx::query_as::<_, Approval>(
            r#"
            SELECT * FROM approvals
            WHERE status = 'pending' AND (officer_id = $1 OR officer_id IS NULL)
            ORDER BY created_at
            "#,
        )
        .bind(officer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
