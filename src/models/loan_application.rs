//! Equipment loan application model and item lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::employee::EmployeeShort;
use crate::workflow::ApplicationStatus;

/// Loan application record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanApplication {
    pub id: i32,
    pub employee_id: i32,
    /// Workflow status, see src/workflow.rs
    pub status: String,
    pub purpose: Option<String>,
    pub location: Option<String>,
    pub loan_start_date: Option<DateTime<Utc>>,
    pub loan_end_date: Option<DateTime<Utc>>,
    pub supporting_officer_id: Option<i32>,
    /// NULL means the applicant is responsible for the equipment
    pub responsible_officer_id: Option<i32>,
    pub applicant_confirmation_timestamp: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub deleted_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Who answers for the equipment while it is out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Responsible {
    Applicant,
    Officer(i32),
}

impl LoanApplication {
    pub fn workflow_status(&self) -> AppResult<ApplicationStatus> {
        self.status.parse()
    }

    pub fn responsible(&self) -> Responsible {
        match self.responsible_officer_id {
            Some(id) => Responsible::Officer(id),
            None => Responsible::Applicant,
        }
    }
}

/// Requested item line (a category and quantity, not a specific asset)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanApplicationItem {
    pub id: i32,
    pub loan_application_id: i32,
    pub equipment_type: String,
    pub quantity_requested: i32,
    pub quantity_approved: Option<i32>,
    pub notes: Option<String>,
}

/// Item line as supplied by the applicant
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoanItemInput {
    pub equipment_type: String,
    #[serde(default = "default_quantity")]
    pub quantity_requested: i32,
    pub notes: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

/// Draft payload; everything optional, nothing validated beyond shape
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoanApplicationDraft {
    pub purpose: Option<String>,
    pub location: Option<String>,
    pub loan_start_date: Option<DateTime<Utc>>,
    pub loan_end_date: Option<DateTime<Utc>>,
    pub supporting_officer_id: Option<i32>,
    pub responsible_officer_id: Option<i32>,
    #[serde(default)]
    pub items: Vec<LoanItemInput>,
}

/// Submission payload; checked by [`validate_loan_submission`]
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitLoanApplication {
    pub purpose: Option<String>,
    pub location: Option<String>,
    pub loan_start_date: Option<DateTime<Utc>>,
    pub loan_end_date: Option<DateTime<Utc>>,
    pub supporting_officer_id: Option<i32>,
    pub responsible_officer_id: Option<i32>,
    #[serde(default)]
    pub items: Vec<LoanItemInput>,
    #[serde(default)]
    pub applicant_confirmation: bool,
}

/// Application with its item lines, for display
#[derive(Debug, Serialize, ToSchema)]
pub struct LoanApplicationDetails {
    pub application: LoanApplication,
    pub applicant: EmployeeShort,
    pub items: Vec<LoanApplicationItem>,
    pub responsible: Responsible,
}

/// Item lines with a blank equipment type are dropped before validation
pub fn drop_blank_items(items: Vec<LoanItemInput>) -> Vec<LoanItemInput> {
    items
        .into_iter()
        .filter(|item| !item.equipment_type.trim().is_empty())
        .collect()
}

/// Strict submission rules for a loan application.
///
/// Expects `items` to already be filtered through [`drop_blank_items`].
pub fn validate_loan_submission(
    payload: &SubmitLoanApplication,
    items: &[LoanItemInput],
) -> AppResult<()> {
    let mut errors: Vec<String> = Vec::new();

    if payload.purpose.as_deref().map(str::trim).unwrap_or("").is_empty() {
        errors.push("purpose: Purpose is required".to_string());
    }
    if payload.location.as_deref().map(str::trim).unwrap_or("").is_empty() {
        errors.push("location: Usage location is required".to_string());
    }
    match (payload.loan_start_date, payload.loan_end_date) {
        (Some(start), Some(end)) => {
            if end < start {
                errors.push("loan_end_date: End date must not precede the start date".to_string());
            }
        }
        (None, _) => errors.push("loan_start_date: Loan start date is required".to_string()),
        (_, None) => errors.push("loan_end_date: Loan end date is required".to_string()),
    }
    if payload.supporting_officer_id.is_none() {
        errors.push("supporting_officer_id: A supporting officer must be selected".to_string());
    }
    if !payload.applicant_confirmation {
        errors.push("applicant_confirmation: The applicant confirmation must be accepted".to_string());
    }
    if items.is_empty() {
        errors.push("items: At least one equipment item is required".to_string());
    }
    for (index, item) in items.iter().enumerate() {
        if item.quantity_requested < 1 {
            errors.push(format!("items[{}].quantity_requested: Quantity must be at least 1", index));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(equipment_type: &str) -> LoanItemInput {
        LoanItemInput {
            equipment_type: equipment_type.to_string(),
            quantity_requested: 1,
            notes: None,
        }
    }

    fn complete_submission() -> SubmitLoanApplication {
        SubmitLoanApplication {
            purpose: Some("Field audit visit".to_string()),
            location: Some("Kuching branch office".to_string()),
            loan_start_date: Some(Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()),
            loan_end_date: Some(Utc.with_ymd_and_hms(2026, 3, 6, 17, 0, 0).unwrap()),
            supporting_officer_id: Some(4),
            responsible_officer_id: None,
            items: vec![item("laptop"), item("projector")],
            applicant_confirmation: true,
        }
    }

    #[test]
    fn test_complete_submission_passes() {
        let payload = complete_submission();
        let items = drop_blank_items(payload.items.clone());
        assert!(validate_loan_submission(&payload, &items).is_ok());
    }

    #[test]
    fn test_blank_item_lines_are_dropped() {
        let items = drop_blank_items(vec![item("laptop"), item("   "), item("")]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].equipment_type, "laptop");
    }

    #[test]
    fn test_submission_fails_when_all_items_blank() {
        let mut payload = complete_submission();
        payload.items = vec![item(""), item("  ")];
        let items = drop_blank_items(payload.items.clone());
        let err = validate_loan_submission(&payload, &items).unwrap_err();
        assert!(err.to_string().contains("items: At least one equipment item"));
    }

    #[test]
    fn test_confirmation_flag_required() {
        let mut payload = complete_submission();
        payload.applicant_confirmation = false;
        let items = drop_blank_items(payload.items.clone());
        let err = validate_loan_submission(&payload, &items).unwrap_err();
        assert!(err.to_string().contains("applicant_confirmation"));
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let mut payload = complete_submission();
        std::mem::swap(&mut payload.loan_start_date, &mut payload.loan_end_date);
        let items = drop_blank_items(payload.items.clone());
        let err = validate_loan_submission(&payload, &items).unwrap_err();
        assert!(err.to_string().contains("loan_end_date"));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut payload = complete_submission();
        payload.items[0].quantity_requested = 0;
        let items = drop_blank_items(payload.items.clone());
        let err = validate_loan_submission(&payload, &items).unwrap_err();
        assert!(err.to_string().contains("quantity_requested"));
    }

    #[test]
    fn test_responsible_defaults_to_applicant() {
        let responsible = match None::<i32> {
            Some(id) => Responsible::Officer(id),
            None => Responsible::Applicant,
        };
        assert_eq!(responsible, Responsible::Applicant);
    }
}
