//! Workflow state tables for applications
//!
//! Every component that reads or advances an application's status goes
//! through this module, so stage labels and transition rules have a single
//! spelling in the whole codebase.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// ApplicationKind
// ---------------------------------------------------------------------------

/// The two application kinds sharing the approval workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    Email,
    Loan,
}

impl ApplicationKind {
    /// Tag stored in approvals.approvable_type
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationKind::Email => "email_application",
            ApplicationKind::Loan => "loan_application",
        }
    }
}

impl fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ApplicationStatus
// ---------------------------------------------------------------------------

/// Workflow status of an application, stored as TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    PendingSupport,
    PendingAdmin,
    Approved,
    Rejected,
    Cancelled,
    Issued,
    Returned,
    Overdue,
    Completed,
    ProvisionFailed,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::PendingSupport => "pending_support",
            ApplicationStatus::PendingAdmin => "pending_admin",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Cancelled => "cancelled",
            ApplicationStatus::Issued => "issued",
            ApplicationStatus::Returned => "returned",
            ApplicationStatus::Overdue => "overdue",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::ProvisionFailed => "provision_failed",
        }
    }

    /// A draft may be edited and submitted
    pub fn is_draft(&self) -> bool {
        matches!(self, ApplicationStatus::Draft)
    }

    /// Cancellation window: before any approval decision was recorded
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Draft
                | ApplicationStatus::PendingSupport
                | ApplicationStatus::PendingAdmin
        )
    }

    /// No further transitions leave this status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected
                | ApplicationStatus::Cancelled
                | ApplicationStatus::Returned
                | ApplicationStatus::Completed
                | ApplicationStatus::ProvisionFailed
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ApplicationStatus::Draft),
            "pending_support" => Ok(ApplicationStatus::PendingSupport),
            "pending_admin" => Ok(ApplicationStatus::PendingAdmin),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "cancelled" => Ok(ApplicationStatus::Cancelled),
            "issued" => Ok(ApplicationStatus::Issued),
            "returned" => Ok(ApplicationStatus::Returned),
            "overdue" => Ok(ApplicationStatus::Overdue),
            "completed" => Ok(ApplicationStatus::Completed),
            "provision_failed" => Ok(ApplicationStatus::ProvisionFailed),
            other => Err(AppError::Internal(format!(
                "Unknown application status '{}'",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// A named decision point in the approval workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    SupportReview,
    AdminReview,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::SupportReview => "support_review",
            Stage::AdminReview => "admin_review",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "support_review" => Ok(Stage::SupportReview),
            "admin_review" => Ok(Stage::AdminReview),
            other => Err(AppError::Internal(format!("Unknown stage '{}'", other))),
        }
    }
}

// ---------------------------------------------------------------------------
// Transition tables
// ---------------------------------------------------------------------------

/// First decision stage after submission, for either kind
pub fn first_stage(_kind: ApplicationKind) -> Stage {
    Stage::SupportReview
}

/// The stage awaiting a decision for the given status, if any
pub fn decision_stage(kind: ApplicationKind, status: ApplicationStatus) -> Option<Stage> {
    match (kind, status) {
        (ApplicationKind::Email, ApplicationStatus::PendingSupport) => Some(Stage::SupportReview),
        (ApplicationKind::Email, ApplicationStatus::PendingAdmin) => Some(Stage::AdminReview),
        (ApplicationKind::Loan, ApplicationStatus::PendingSupport) => Some(Stage::SupportReview),
        _ => None,
    }
}

/// Status reached when the given stage is approved
pub fn next_on_approval(kind: ApplicationKind, stage: Stage) -> ApplicationStatus {
    match (kind, stage) {
        (ApplicationKind::Email, Stage::SupportReview) => ApplicationStatus::PendingAdmin,
        (ApplicationKind::Email, Stage::AdminReview) => ApplicationStatus::Approved,
        // Loans have a single review stage
        (ApplicationKind::Loan, _) => ApplicationStatus::Approved,
    }
}

/// Whether the given status awaits an officer decision at all
pub fn is_awaiting_decision(kind: ApplicationKind, status: ApplicationStatus) -> bool {
    decision_stage(kind, status).is_some()
}

// ---------------------------------------------------------------------------
// ApprovalDecision
// ---------------------------------------------------------------------------

/// Outcome of one officer decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

impl ApprovalDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalDecision::Approved => "approved",
            ApprovalDecision::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ApplicationStatus::Draft,
            ApplicationStatus::PendingSupport,
            ApplicationStatus::PendingAdmin,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
            ApplicationStatus::Cancelled,
            ApplicationStatus::Issued,
            ApplicationStatus::Returned,
            ApplicationStatus::Overdue,
            ApplicationStatus::Completed,
            ApplicationStatus::ProvisionFailed,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
        assert!("support_review".parse::<Stage>().is_ok());
        assert!("officer_review".parse::<Stage>().is_err());
    }

    #[test]
    fn test_email_stage_sequence() {
        let kind = ApplicationKind::Email;
        assert!(is_awaiting_decision(kind, ApplicationStatus::PendingSupport));
        let stage = decision_stage(kind, ApplicationStatus::PendingSupport).unwrap();
        assert_eq!(stage, Stage::SupportReview);

        let status = next_on_approval(kind, stage);
        assert_eq!(status, ApplicationStatus::PendingAdmin);

        let stage = decision_stage(kind, status).unwrap();
        assert_eq!(stage, Stage::AdminReview);

        let status = next_on_approval(kind, stage);
        assert_eq!(status, ApplicationStatus::Approved);
        assert!(decision_stage(kind, status).is_none());
    }

    #[test]
    fn test_loan_stage_sequence() {
        let kind = ApplicationKind::Loan;
        let stage = decision_stage(kind, ApplicationStatus::PendingSupport).unwrap();
        assert_eq!(stage, Stage::SupportReview);
        assert_eq!(next_on_approval(kind, stage), ApplicationStatus::Approved);
        assert!(decision_stage(kind, ApplicationStatus::Approved).is_none());
    }

    #[test]
    fn test_advance_is_monotonic() {
        // Walking next_on_approval from the first stage never revisits an
        // earlier decision state for either kind.
        for kind in [ApplicationKind::Email, ApplicationKind::Loan] {
            let mut seen = Vec::new();
            let mut status = ApplicationStatus::PendingSupport;
            while let Some(stage) = decision_stage(kind, status) {
                assert!(!seen.contains(&status), "revisited {:?}", status);
                seen.push(status);
                status = next_on_approval(kind, stage);
            }
            assert_eq!(status, ApplicationStatus::Approved);
        }
    }

    #[test]
    fn test_terminal_states_have_no_stage() {
        for kind in [ApplicationKind::Email, ApplicationKind::Loan] {
            for status in [
                ApplicationStatus::Rejected,
                ApplicationStatus::Cancelled,
                ApplicationStatus::Returned,
                ApplicationStatus::Completed,
                ApplicationStatus::ProvisionFailed,
            ] {
                assert!(status.is_terminal());
                assert!(decision_stage(kind, status).is_none());
            }
        }
    }

    #[test]
    fn test_cancellation_window() {
        assert!(ApplicationStatus::Draft.can_cancel());
        assert!(ApplicationStatus::PendingSupport.can_cancel());
        assert!(ApplicationStatus::PendingAdmin.can_cancel());
        assert!(!ApplicationStatus::Approved.can_cancel());
        assert!(!ApplicationStatus::Issued.can_cancel());
        assert!(!ApplicationStatus::Rejected.can_cancel());
    }
}
