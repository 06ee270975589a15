//! Email / mailbox provisioning application model

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::enums::EmploymentStatus;
use crate::workflow::ApplicationStatus;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]*@[a-z0-9][a-z0-9.-]*\.[a-z]{2,}$").unwrap());

/// Email application record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EmailApplication {
    pub id: i32,
    pub employee_id: i32,
    /// Workflow status, see src/workflow.rs
    pub status: String,
    pub purpose: Option<String>,
    /// Employment nature of the applicant at submission time
    pub service_status: Option<String>,
    pub proposed_email: Option<String>,
    pub group_email: Option<String>,
    pub group_contact_name: Option<String>,
    pub group_contact_email: Option<String>,
    pub supporting_officer_id: Option<i32>,
    pub certification_accepted: bool,
    pub certification_timestamp: Option<DateTime<Utc>>,
    pub final_assigned_email: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub deleted_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl EmailApplication {
    pub fn workflow_status(&self) -> AppResult<ApplicationStatus> {
        self.status.parse()
    }
}

/// Draft payload; everything optional, nothing validated beyond shape
#[derive(Debug, Deserialize, ToSchema)]
pub struct EmailApplicationDraft {
    pub purpose: Option<String>,
    pub service_status: Option<EmploymentStatus>,
    pub proposed_email: Option<String>,
    pub group_email: Option<String>,
    pub group_contact_name: Option<String>,
    pub group_contact_email: Option<String>,
    pub supporting_officer_id: Option<i32>,
}

/// Submission payload; checked by [`validate_email_submission`]
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitEmailApplication {
    pub purpose: Option<String>,
    pub service_status: Option<EmploymentStatus>,
    pub proposed_email: Option<String>,
    pub group_email: Option<String>,
    pub group_contact_name: Option<String>,
    pub group_contact_email: Option<String>,
    pub supporting_officer_id: Option<i32>,
    #[serde(default)]
    pub certification_accepted: bool,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

/// Strict submission rules for an email application.
///
/// The request must name either a personal mailbox (proposed_email) or a
/// group mailbox (group_email plus a contact person), not neither.
pub fn validate_email_submission(payload: &SubmitEmailApplication) -> AppResult<()> {
    let mut errors: Vec<String> = Vec::new();

    if is_blank(&payload.purpose) {
        errors.push("purpose: Purpose is required".to_string());
    }
    if payload.service_status.is_none() {
        errors.push("service_status: Employment status is required".to_string());
    }
    if payload.supporting_officer_id.is_none() {
        errors.push("supporting_officer_id: A supporting officer must be selected".to_string());
    }
    if !payload.certification_accepted {
        errors.push("certification_accepted: The certification must be accepted".to_string());
    }

    let has_personal = !is_blank(&payload.proposed_email);
    let has_group = !is_blank(&payload.group_email);

    match (has_personal, has_group) {
        (false, false) => {
            errors.push(
                "proposed_email: Either a proposed email or a group email is required".to_string(),
            );
        }
        (true, _) => {
            let email = payload.proposed_email.as_deref().unwrap_or("").trim();
            if !EMAIL_RE.is_match(&email.to_lowercase()) {
                errors.push("proposed_email: Invalid email format".to_string());
            }
        }
        (false, true) => {
            let email = payload.group_email.as_deref().unwrap_or("").trim();
            if !EMAIL_RE.is_match(&email.to_lowercase()) {
                errors.push("group_email: Invalid email format".to_string());
            }
            if is_blank(&payload.group_contact_name) {
                errors.push("group_contact_name: A contact person is required for group mailboxes".to_string());
            }
            if is_blank(&payload.group_contact_email) {
                errors.push("group_contact_email: A contact email is required for group mailboxes".to_string());
            }
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

    fn complete_submission() -> SubmitEmailApplication {
        SubmitEmailApplication {
            purpose: Some("Official correspondence for the procurement unit".to_string()),
            service_status: Some(EmploymentStatus::Permanent),
            proposed_email: Some("nurul.huda@agency.gov.my".to_string()),
            group_email: None,
            group_contact_name: None,
            group_contact_email: None,
            supporting_officer_id: Some(7),
            certification_accepted: true,
        }
    }

    #[test]
    fn test_complete_submission_passes() {
        assert!(validate_email_submission(&complete_submission()).is_ok());
    }

    #[test]
    fn test_missing_purpose_is_field_error() {
        let mut payload = complete_submission();
        payload.purpose = Some("   ".to_string());
        let err = validate_email_submission(&payload).unwrap_err();
        assert!(err.to_string().contains("purpose:"));
    }

    #[test]
    fn test_certification_must_be_accepted() {
        let mut payload = complete_submission();
        payload.certification_accepted = false;
        let err = validate_email_submission(&payload).unwrap_err();
        assert!(err.to_string().contains("certification_accepted"));
    }

    #[test]
    fn test_group_request_needs_contact_person() {
        let mut payload = complete_submission();
        payload.proposed_email = None;
        payload.group_email = Some("unit-ict@agency.gov.my".to_string());
        let err = validate_email_submission(&payload).unwrap_err();
        assert!(err.to_string().contains("group_contact_name"));
        assert!(err.to_string().contains("group_contact_email"));

        payload.group_contact_name = Some("Aina Rahman".to_string());
        payload.group_contact_email = Some("aina.rahman@agency.gov.my".to_string());
        assert!(validate_email_submission(&payload).is_ok());
    }

    #[test]
    fn test_malformed_proposed_email_rejected() {
        let mut payload = complete_submission();
        payload.proposed_email = Some("not an address".to_string());
        let err = validate_email_submission(&payload).unwrap_err();
        assert!(err.to_string().contains("proposed_email: Invalid email format"));
    }

    #[test]
    fn test_neither_shape_rejected() {
        let mut payload = complete_submission();
        payload.proposed_email = None;
        assert!(validate_email_submission(&payload).is_err());
    }
}
