//! Approval history rows, polymorphic over both application kinds

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::workflow::{ApplicationKind, ApprovalDecision};

/// Typed reference to the application an approval row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approvable {
    Email(i32),
    Loan(i32),
}

impl Approvable {
    pub fn kind(&self) -> ApplicationKind {
        match self {
            Approvable::Email(_) => ApplicationKind::Email,
            Approvable::Loan(_) => ApplicationKind::Loan,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Approvable::Email(id) | Approvable::Loan(id) => *id,
        }
    }

    /// Tag stored in approvals.approvable_type
    pub fn type_tag(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn from_tag(tag: &str, id: i32) -> Result<Self, AppError> {
        match tag {
            "email_application" => Ok(Approvable::Email(id)),
            "loan_application" => Ok(Approvable::Loan(id)),
            other => Err(AppError::Internal(format!(
                "Unknown approvable type '{}'",
                other
            ))),
        }
    }
}

/// Approval record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Approval {
    pub id: i32,
    /// email_application | loan_application
    pub approvable_type: String,
    pub approvable_id: i32,
    /// support_review | admin_review
    pub stage: String,
    /// NULL while the stage task is unassigned
    pub officer_id: Option<i32>,
    /// pending, approved, rejected
    pub status: String,
    pub comments: Option<String>,
    pub approval_timestamp: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Officer decision request
#[derive(Debug, Deserialize, ToSchema)]
pub struct DecisionRequest {
    pub decision: ApprovalDecision,
    pub comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approvable_tag_round_trip() {
        let approvable = Approvable::Email(12);
        assert_eq!(approvable.type_tag(), "email_application");
        assert_eq!(
            Approvable::from_tag(approvable.type_tag(), approvable.id()).unwrap(),
            approvable
        );

        let approvable = Approvable::Loan(3);
        assert_eq!(approvable.type_tag(), "loan_application");
        assert_eq!(
            Approvable::from_tag(approvable.type_tag(), approvable.id()).unwrap(),
            approvable
        );

        assert!(Approvable::from_tag("leave_request", 1).is_err());
    }
}
