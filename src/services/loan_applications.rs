//! Loan application service (draft, submit, cancel)

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::approval::Approvable,
    models::claims::UserClaims,
    models::loan_application::{
        drop_blank_items, validate_loan_submission, LoanApplication, LoanApplicationDetails,
        LoanApplicationDraft, SubmitLoanApplication,
    },
    repository::Repository,
    workflow::{self, ApplicationKind, ApplicationStatus},
};

use super::notify::NotifyService;

#[derive(Clone)]
pub struct LoanApplicationsService {
    repository: Repository,
    notify: NotifyService,
}

impl LoanApplicationsService {
    pub fn new(repository: Repository, notify: NotifyService) -> Self {
        Self { repository, notify }
    }

    /// Applications visible to the caller: their own, or everyone's for
    /// officers and admins
    pub async fn list(
        &self,
        claims: &UserClaims,
        status: Option<ApplicationStatus>,
        all: bool,
    ) -> AppResult<Vec<LoanApplication>> {
        claims.require_read_applications()?;
        let employee_id = if all && self.can_see_all(claims) {
            None
        } else {
            Some(claims.employee_id)
        };
        self.repository.loan_applications.list(employee_id, status).await
    }

    /// One application with its item lines
    pub async fn get_details(&self, id: i32, claims: &UserClaims) -> AppResult<LoanApplicationDetails> {
        claims.require_read_applications()?;
        let application = self.repository.loan_applications.get_by_id(id).await?;
        self.require_visible(&application, claims)?;
        let applicant = self.repository.employees.get_short(application.employee_id).await?;
        let items = self.repository.loan_applications.items_for(id).await?;
        let responsible = application.responsible();
        Ok(LoanApplicationDetails {
            application,
            applicant,
            items,
            responsible,
        })
    }

    /// Create a new draft owned by the caller
    pub async fn create_draft(
        &self,
        claims: &UserClaims,
        draft: &LoanApplicationDraft,
    ) -> AppResult<LoanApplication> {
        claims.require_write_applications()?;
        self.repository.employees.get_by_id(claims.employee_id).await?;
        self.repository
            .loan_applications
            .create_draft(claims.employee_id, draft, claims.employee_id)
            .await
    }

    /// Overwrite mutable fields and item lines; only drafts are editable
    pub async fn update_draft(
        &self,
        id: i32,
        claims: &UserClaims,
        draft: &LoanApplicationDraft,
    ) -> AppResult<LoanApplication> {
        claims.require_write_applications()?;
        let application = self.repository.loan_applications.get_by_id(id).await?;
        self.require_owner(&application, claims)?;

        self.repository
            .loan_applications
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
    /// Item lines with a blank equipment type are dropped before the
    /// non-empty check. Field persistence, the status change and the first
    /// pending approval are one unit of work.
    pub async fn submit(
        &self,
        id: i32,
        claims: &UserClaims,
        payload: &SubmitLoanApplication,
    ) -> AppResult<LoanApplication> {
        claims.require_write_applications()?;
        let application = self.repository.loan_applications.get_by_id(id).await?;
        self.require_owner(&application, claims)?;

        let items = drop_blank_items(payload.items.clone());
        validate_loan_submission(payload, &items)?;

        let officer_id = payload.supporting_officer_id.ok_or_else(|| {
            AppError::Validation("supporting_officer_id: A supporting officer must be selected".to_string())
        })?;
        let officer = self.repository.employees.get_by_id(officer_id).await?;
        if let Some(responsible_id) = payload.responsible_officer_id {
            self.repository.employees.get_by_id(responsible_id).await?;
        }

        let now = Utc::now();
        let mut tx = self.repository.begin().await?;

        let submitted = self
            .repository
            .loan_applications
            .submit(&mut tx, id, payload, &items, now, claims.employee_id)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(format!("Application {} has already been submitted", id))
            })?;

        self.repository
            .approvals
            .insert_pending(
                &mut tx,
                Approvable::Loan(id),
                workflow::first_stage(ApplicationKind::Loan),
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
                    .application_submitted(address, ApplicationKind::Loan, id, &applicant_name)
                    .await
                {
                    tracing::warn!("Submission notice failed: {}", e);
                }
            }
        }

        Ok(submitted)
    }

    /// Cancel an application before any decision was made
    pub async fn cancel(&self, id: i32, claims: &UserClaims) -> AppResult<LoanApplication> {
        claims.require_write_applications()?;

        let mut tx = self.repository.begin().await?;
        let application = self.repository.loan_applications.get_for_update(&mut tx, id).await?;
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
            .loan_applications
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
            .cancel_pending(&mut tx, Approvable::Loan(id))
            .await?;
        tx.commit().await?;

        self.repository.loan_applications.get_by_id(id).await
    }

    /// Soft-delete an abandoned draft
    pub async fn delete_draft(&self, id: i32, claims: &UserClaims) -> AppResult<()> {
        claims.require_write_applications()?;
        let application = self.repository.loan_applications.get_by_id(id).await?;
        self.require_owner(&application, claims)?;

        if self
            .repository
            .loan_applications
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

    fn can_see_all(&self, claims: &UserClaims) -> bool {
        claims.is_admin || claims.require_approvals().is_ok() || claims.require_write_equipment().is_ok()
    }

    fn require_visible(&self, application: &LoanApplication, claims: &UserClaims) -> AppResult<()> {
        if application.employee_id == claims.employee_id || self.can_see_all(claims) {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "You may only view your own applications".to_string(),
            ))
        }
    }

    fn require_owner(&self, application: &LoanApplication, claims: &UserClaims) -> AppResult<()> {
        if application.employee_id == claims.employee_id {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only the applicant may modify this application".to_string(),
            ))
        }
    }
}
