//! Shared domain enums
//!
//! All of these are stored as TEXT; the string forms below are the only
//! spellings that may appear in the database.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// EquipmentAvailability
// ---------------------------------------------------------------------------

/// Where a piece of equipment currently stands in the loan cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentAvailability {
    Available,
    OnLoan,
    UnderMaintenance,
    Retired,
    Missing,
}

impl EquipmentAvailability {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentAvailability::Available => "available",
            EquipmentAvailability::OnLoan => "on_loan",
            EquipmentAvailability::UnderMaintenance => "under_maintenance",
            EquipmentAvailability::Retired => "retired",
            EquipmentAvailability::Missing => "missing",
        }
    }

    /// Dispositions a return handler may choose from
    pub fn is_return_disposition(&self) -> bool {
        matches!(
            self,
            EquipmentAvailability::Available
                | EquipmentAvailability::UnderMaintenance
                | EquipmentAvailability::Retired
        )
    }
}

impl fmt::Display for EquipmentAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EquipmentAvailability {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(EquipmentAvailability::Available),
            "on_loan" => Ok(EquipmentAvailability::OnLoan),
            "under_maintenance" => Ok(EquipmentAvailability::UnderMaintenance),
            "retired" => Ok(EquipmentAvailability::Retired),
            "missing" => Ok(EquipmentAvailability::Missing),
            other => Err(AppError::Internal(format!(
                "Unknown availability status '{}'",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// EquipmentCondition
// ---------------------------------------------------------------------------

/// Physical condition of a piece of equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCondition {
    Good,
    Fair,
    MinorDamage,
    MajorDamage,
    Unserviceable,
    Lost,
}

impl EquipmentCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentCondition::Good => "good",
            EquipmentCondition::Fair => "fair",
            EquipmentCondition::MinorDamage => "minor_damage",
            EquipmentCondition::MajorDamage => "major_damage",
            EquipmentCondition::Unserviceable => "unserviceable",
            EquipmentCondition::Lost => "lost",
        }
    }
}

impl fmt::Display for EquipmentCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EquipmentCondition {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(EquipmentCondition::Good),
            "fair" => Ok(EquipmentCondition::Fair),
            "minor_damage" => Ok(EquipmentCondition::MinorDamage),
            "major_damage" => Ok(EquipmentCondition::MajorDamage),
            "unserviceable" => Ok(EquipmentCondition::Unserviceable),
            "lost" => Ok(EquipmentCondition::Lost),
            other => Err(AppError::Internal(format!(
                "Unknown condition status '{}'",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionStatus
// ---------------------------------------------------------------------------

/// State of one equipment hand-off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Issued,
    Returned,
    Damaged,
    Lost,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Issued => "issued",
            TransactionStatus::Returned => "returned",
            TransactionStatus::Damaged => "damaged",
            TransactionStatus::Lost => "lost",
        }
    }

    /// Valid outcomes of a return; `issued` is not one
    pub fn is_return_outcome(&self) -> bool {
        !matches!(self, TransactionStatus::Issued)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issued" => Ok(TransactionStatus::Issued),
            "returned" => Ok(TransactionStatus::Returned),
            "damaged" => Ok(TransactionStatus::Damaged),
            "lost" => Ok(TransactionStatus::Lost),
            other => Err(AppError::Internal(format!(
                "Unknown transaction status '{}'",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// EmploymentStatus
// ---------------------------------------------------------------------------

/// Employment nature of an employee (service_status column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Permanent,
    Contract,
    Intern,
    Agency,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Permanent => "permanent",
            EmploymentStatus::Contract => "contract",
            EmploymentStatus::Intern => "intern",
            EmploymentStatus::Agency => "agency",
        }
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LeaveType / LeaveStatus
// ---------------------------------------------------------------------------

/// Category of a leave request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Annual,
    Medical,
    Emergency,
    Unpaid,
    Other,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Medical => "medical",
            LeaveType::Emergency => "emergency",
            LeaveType::Unpaid => "unpaid",
            LeaveType::Other => "other",
        }
    }
}

/// Status of a leave request (single-stage decision)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for LeaveStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "rejected" => Ok(LeaveStatus::Rejected),
            "cancelled" => Ok(LeaveStatus::Cancelled),
            other => Err(AppError::Internal(format!(
                "Unknown leave status '{}'",
                other
            ))),
        }
    }
}
