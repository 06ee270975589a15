//! Approval recorder
//!
//! One officer decision at a time: authorize, re-read the application under
//! a row lock, complete the stage's pending task, then advance or reject.
//! Stage labels and transitions come from src/workflow.rs only.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::approval::{Approvable, Approval},
    models::claims::UserClaims,
    repository::{PgTx, Repository},
    workflow::{self, ApplicationStatus, ApprovalDecision, Stage},
};

use super::notify::NotifyService;

#[derive(Clone)]
pub struct ApprovalsService {
    repository: Repository,
    notify: NotifyService,
}

impl ApprovalsService {
    pub fn new(repository: Repository, notify: NotifyService) -> Self {
        Self { repository, notify }
    }

    /// Approval history of one application
    pub async fn list_for(&self, approvable: Approvable) -> AppResult<Vec<Approval>> {
        self.repository.approvals.list_for(approvable).await
    }

    /// Pending decision tasks for the calling officer
    pub async fn pending_for(&self, claims: &UserClaims) -> AppResult<Vec<Approval>> {
        claims.require_approvals()?;
        self.repository.approvals.pending_for_officer(claims.employee_id).await
    }

    /// Record one officer decision and move the application along.
    ///
    /// The whole operation is a single unit of work; an error anywhere rolls
    /// back the approval row and the status change together.
    pub async fn record_decision(
        &self,
        approvable: Approvable,
        claims: &UserClaims,
        decision: ApprovalDecision,
        comments: Option<String>,
    ) -> AppResult<Approval> {
        claims.require_approvals()?;

        let mut tx = self.repository.begin().await?;

        // Fresh status read under a row lock; the stage table decides
        // whether a decision is expected at all.
        let (status, applicant_id) = match approvable {
            Approvable::Email(id) => {
                let app = self.repository.email_applications.get_for_update(&mut tx, id).await?;
                (app.workflow_status()?, app.employee_id)
            }
            Approvable::Loan(id) => {
                let app = self.repository.loan_applications.get_for_update(&mut tx, id).await?;
                (app.workflow_status()?, app.employee_id)
            }
        };

        let kind = approvable.kind();
        let stage = workflow::decision_stage(kind, status).ok_or_else(|| {
            AppError::InvalidState(format!(
                "Application {} is not awaiting a decision (status {})",
                approvable.id(),
                status
            ))
        })?;

        // An assigned task may only be completed by its officer (or an admin)
        let pending = self
            .repository
            .approvals
            .get_pending_for_stage(&mut tx, approvable, stage)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(format!(
                    "No open {} task for application {}",
                    stage,
                    approvable.id()
                ))
            })?;
        if let Some(assigned) = pending.officer_id {
            if assigned != claims.employee_id && !claims.is_admin {
                return Err(AppError::Authorization(format!(
                    "The {} task is assigned to another officer",
                    stage
                )));
            }
        }

        let approval = self
            .repository
            .approvals
            .complete_pending(
                &mut tx,
                approvable,
                stage,
                claims.employee_id,
                decision,
                comments.as_deref(),
                Utc::now(),
            )
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(format!(
                    "No open {} task for application {}",
                    stage,
                    approvable.id()
                ))
            })?;

        match decision {
            ApprovalDecision::Approved => {
                self.advance(&mut tx, approvable, status, stage, claims).await?;
            }
            ApprovalDecision::Rejected => {
                self.reject(&mut tx, approvable, status, comments.as_deref(), claims).await?;
            }
        }

        tx.commit().await?;

        self.notify_applicant(approvable, applicant_id, decision, comments.as_deref()).await;

        Ok(approval)
    }

    async fn advance(
        &self,
        tx: &mut PgTx<'_>,
        approvable: Approvable,
        current: ApplicationStatus,
        stage: Stage,
        claims: &UserClaims,
    ) -> AppResult<()> {
        let kind = approvable.kind();
        let next = workflow::next_on_approval(kind, stage);
        let id = approvable.id();

        let moved = match approvable {
            Approvable::Email(_) => {
                self.repository
                    .email_applications
                    .transition_status(tx, id, current, next, claims.employee_id)
                    .await?
            }
            Approvable::Loan(_) => {
                if next == ApplicationStatus::Approved {
                    self.repository.loan_applications.approve_quantities(tx, id).await?;
                }
                self.repository
                    .loan_applications
                    .transition_status(tx, id, current, next, claims.employee_id)
                    .await?
            }
        };
        if !moved {
            return Err(AppError::InvalidState(format!(
                "Application {} changed state while the decision was being recorded",
                id
            )));
        }

        // A further stage opens its own task; the admin-stage task is left
        // unassigned for any authorized officer to pick up.
        if let Some(next_stage) = workflow::decision_stage(kind, next) {
            self.repository
                .approvals
                .insert_pending(tx, approvable, next_stage, None)
                .await?;
        }

        Ok(())
    }

    async fn reject(
        &self,
        tx: &mut PgTx<'_>,
        approvable: Approvable,
        current: ApplicationStatus,
        reason: Option<&str>,
        claims: &UserClaims,
    ) -> AppResult<()> {
        let id = approvable.id();
        let moved = match approvable {
            Approvable::Email(_) => {
                self.repository
                    .email_applications
                    .reject(tx, id, current, reason, claims.employee_id)
                    .await?
            }
            Approvable::Loan(_) => {
                self.repository
                    .loan_applications
                    .reject(tx, id, current, reason, claims.employee_id)
                    .await?
            }
        };
        if !moved {
            return Err(AppError::InvalidState(format!(
                "Application {} changed state while the decision was being recorded",
                id
            )));
        }
        Ok(())
    }

    async fn notify_applicant(
        &self,
        approvable: Approvable,
        applicant_id: i32,
        decision: ApprovalDecision,
        comments: Option<&str>,
    ) {
        let employee = match self.repository.employees.get_by_id(applicant_id).await {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Decision notice skipped, applicant lookup failed: {}", e);
                return;
            }
        };
        let Some(address) = employee.work_email.as_deref() else {
            return;
        };
        if let Err(e) = self
            .notify
            .application_decided(
                address,
                approvable.kind(),
                approvable.id(),
                decision,
                comments,
            )
            .await
        {
            tracing::warn!("Decision notice failed: {}", e);
        }
    }
}
