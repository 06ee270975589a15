//! Equipment transaction recorder
//!
//! Issuance and return both mutate three things in lockstep: the
//! transaction row, the equipment's availability and the application's
//! status. Each operation is one unit of work with compare-and-swap writes,
//! so two officers racing on the same asset cannot double-issue it.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::claims::UserClaims,
    models::enums::{EquipmentAvailability, EquipmentCondition, TransactionStatus},
    models::loan_transaction::{IssueRequest, LoanTransaction, LoanTransactionDetails, ReturnRequest},
    repository::Repository,
    workflow::ApplicationStatus,
};

#[derive(Clone)]
pub struct IssuanceService {
    repository: Repository,
}

impl IssuanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Hand-offs of one application, with lateness computed against the
    /// application's end date
    pub async fn transactions_for(
        &self,
        application_id: i32,
        claims: &UserClaims,
    ) -> AppResult<Vec<LoanTransactionDetails>> {
        claims.require_read_applications()?;
        let application = self.repository.loan_applications.get_by_id(application_id).await?;
        let transactions = self
            .repository
            .loan_transactions
            .list_for_application(application_id)
            .await?;

        let now = Utc::now();
        let overdue_cutoff = application.loan_end_date;
        Ok(transactions
            .into_iter()
            .map(|transaction| {
                let is_overdue = transaction.is_outstanding()
                    && overdue_cutoff.map(|end| end < now).unwrap_or(false);
                LoanTransactionDetails {
                    transaction,
                    is_overdue,
                }
            })
            .collect())
    }

    /// Issue one specific asset against an approved application.
    ///
    /// The first issuance moves the application from approved to issued;
    /// further lines of a multi-item loan are issued while it already is.
    pub async fn issue(
        &self,
        application_id: i32,
        claims: &UserClaims,
        request: &IssueRequest,
    ) -> AppResult<LoanTransaction> {
        claims.require_write_equipment()?;

        let mut tx = self.repository.begin().await?;

        let application = self
            .repository
            .loan_applications
            .get_for_update(&mut tx, application_id)
            .await?;
        let app_status = application.workflow_status()?;
        if !matches!(app_status, ApplicationStatus::Approved | ApplicationStatus::Issued) {
            return Err(AppError::InvalidState(format!(
                "Application {} is not ready for issuance (status {})",
                application_id, app_status
            )));
        }

        let equipment = self
            .repository
            .equipment
            .get_for_update(&mut tx, request.equipment_id)
            .await?;
        if equipment.availability()? != EquipmentAvailability::Available {
            return Err(AppError::InvalidState(format!(
                "Equipment {} is not available (status {})",
                equipment.id, equipment.availability_status
            )));
        }

        let now = Utc::now();
        let transaction = self
            .repository
            .loan_transactions
            .insert_issue(
                &mut tx,
                application_id,
                request.equipment_id,
                claims.employee_id,
                request.receiving_officer_id,
                request.accessories.clone(),
                request.notes.as_deref(),
                now,
            )
            .await?;

        // Equipment follows whoever answers for the loan
        let holder = application
            .responsible_officer_id
            .unwrap_or(application.employee_id);
        let flipped = self
            .repository
            .equipment
            .set_availability(
                &mut tx,
                equipment.id,
                EquipmentAvailability::Available,
                EquipmentAvailability::OnLoan,
                None,
                Some(holder),
            )
            .await?;
        if !flipped {
            return Err(AppError::InvalidState(format!(
                "Equipment {} changed state during issuance",
                equipment.id
            )));
        }

        if app_status == ApplicationStatus::Approved {
            let moved = self
                .repository
                .loan_applications
                .transition_status(
                    &mut tx,
                    application_id,
                    ApplicationStatus::Approved,
                    ApplicationStatus::Issued,
                    claims.employee_id,
                )
                .await?;
            if !moved {
                return Err(AppError::InvalidState(format!(
                    "Application {} changed state during issuance",
                    application_id
                )));
            }
        }

        tx.commit().await?;
        Ok(transaction)
    }

    /// Close one outstanding transaction and settle the equipment and, when
    /// it was the last line out, the application.
    pub async fn process_return(
        &self,
        transaction_id: i32,
        claims: &UserClaims,
        request: &ReturnRequest,
    ) -> AppResult<LoanTransaction> {
        claims.require_write_equipment()?;

        if !request.return_status.is_return_outcome() {
            return Err(AppError::BadRequest(
                "return_status must be returned, damaged or lost".to_string(),
            ));
        }
        if request.return_status != TransactionStatus::Lost
            && !request.equipment_status_on_return.is_return_disposition()
        {
            return Err(AppError::BadRequest(
                "equipment_status_on_return must be available, under_maintenance or retired"
                    .to_string(),
            ));
        }

        let mut tx = self.repository.begin().await?;

        let transaction = self
            .repository
            .loan_transactions
            .get_for_update(&mut tx, transaction_id)
            .await?;
        if transaction.transaction_status()? != TransactionStatus::Issued
            || transaction.return_timestamp.is_some()
        {
            return Err(AppError::InvalidState(format!(
                "Transaction {} has already been closed",
                transaction_id
            )));
        }

        let now = Utc::now();
        let completed = self
            .repository
            .loan_transactions
            .complete_return(
                &mut tx,
                transaction_id,
                request.return_status,
                request.returning_officer_id,
                claims.employee_id,
                request.accessories.clone(),
                request.notes.as_deref(),
                now,
            )
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(format!(
                    "Transaction {} has already been closed",
                    transaction_id
                ))
            })?;

        let (availability, condition) = match request.return_status {
            TransactionStatus::Lost => (
                EquipmentAvailability::Missing,
                Some(EquipmentCondition::Lost),
            ),
            TransactionStatus::Damaged => (
                request.equipment_status_on_return,
                Some(
                    request
                        .condition_on_return
                        .unwrap_or(EquipmentCondition::MinorDamage),
                ),
            ),
            TransactionStatus::Returned => {
                (request.equipment_status_on_return, request.condition_on_return)
            }
            TransactionStatus::Issued => unreachable!("rejected above"),
        };

        let flipped = self
            .repository
            .equipment
            .set_availability(
                &mut tx,
                transaction.equipment_id,
                EquipmentAvailability::OnLoan,
                availability,
                condition,
                None,
            )
            .await?;
        if !flipped {
            return Err(AppError::InvalidState(format!(
                "Equipment {} is not on loan",
                transaction.equipment_id
            )));
        }

        // The application settles only once its last line is back
        let application = self
            .repository
            .loan_applications
            .get_for_update(&mut tx, transaction.loan_application_id)
            .await?;
        let outstanding = self
            .repository
            .loan_transactions
            .count_other_outstanding(&mut tx, application.id, transaction_id)
            .await?;
        if outstanding == 0 {
            let app_status = application.workflow_status()?;
            if matches!(app_status, ApplicationStatus::Issued | ApplicationStatus::Overdue) {
                let moved = self
                    .repository
                    .loan_applications
                    .transition_status(
                        &mut tx,
                        application.id,
                        app_status,
                        ApplicationStatus::Returned,
                        claims.employee_id,
                    )
                    .await?;
                if !moved {
                    return Err(AppError::InvalidState(format!(
                        "Application {} changed state during the return",
                        application.id
                    )));
                }
            }
        }

        tx.commit().await?;
        Ok(completed)
    }

    /// Sweep issued applications past their end date into overdue
    pub async fn flag_overdue(&self, claims: &UserClaims) -> AppResult<Vec<i32>> {
        claims.require_admin()?;
        let flagged = self.repository.loan_applications.flag_overdue(Utc::now()).await?;
        if !flagged.is_empty() {
            tracing::info!("Flagged {} loan application(s) overdue", flagged.len());
        }
        Ok(flagged)
    }
}
