//! Loan transaction model (one row per equipment hand-off)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::models::enums::{EquipmentAvailability, TransactionStatus};

/// Loan transaction record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanTransaction {
    pub id: i32,
    pub loan_application_id: i32,
    pub equipment_id: i32,
    /// issued, returned, damaged, lost
    pub status: String,
    pub issuing_officer_id: i32,
    pub receiving_officer_id: Option<i32>,
    pub issue_timestamp: DateTime<Utc>,
    #[schema(value_type = Option<Vec<String>>)]
    pub accessories_on_issue: Option<Json<Vec<String>>>,
    pub issue_notes: Option<String>,
    pub returning_officer_id: Option<i32>,
    pub accepting_officer_id: Option<i32>,
    pub return_timestamp: Option<DateTime<Utc>>,
    #[schema(value_type = Option<Vec<String>>)]
    pub accessories_on_return: Option<Json<Vec<String>>>,
    pub return_notes: Option<String>,
}

impl LoanTransaction {
    pub fn transaction_status(&self) -> AppResult<TransactionStatus> {
        self.status.parse()
    }

    /// No return has been recorded yet
    pub fn is_outstanding(&self) -> bool {
        self.return_timestamp.is_none()
    }
}

/// Issue request: hand one specific asset over against an approved application
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueRequest {
    pub equipment_id: i32,
    /// Officer physically receiving the equipment, if not the applicant
    pub receiving_officer_id: Option<i32>,
    pub accessories: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// Return request: close one outstanding transaction
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub returning_officer_id: Option<i32>,
    pub accessories: Option<Vec<String>>,
    pub notes: Option<String>,
    /// returned, damaged or lost
    pub return_status: TransactionStatus,
    /// available, under_maintenance or retired
    pub equipment_status_on_return: EquipmentAvailability,
    /// Overrides the default condition downgrade on damaged/lost returns
    pub condition_on_return: Option<crate::models::enums::EquipmentCondition>,
}

/// Transaction enriched with lateness, for display
#[derive(Debug, Serialize, ToSchema)]
pub struct LoanTransactionDetails {
    pub transaction: LoanTransaction,
    pub is_overdue: bool,
}
