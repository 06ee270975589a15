//! Equipment model (loanable ICT assets)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::AppResult;
use crate::models::enums::{EquipmentAvailability, EquipmentCondition};

/// Equipment record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    /// Inventory tag, unique per asset
    pub asset_tag: String,
    /// Free-text category: laptop, projector, tablet, ...
    pub equipment_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    /// available, on_loan, under_maintenance, retired, missing
    pub availability_status: String,
    /// good, fair, minor_damage, major_damage, unserviceable, lost
    pub condition_status: String,
    pub assigned_to_employee_id: Option<i32>,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    pub fn availability(&self) -> AppResult<EquipmentAvailability> {
        self.availability_status.parse()
    }

    pub fn condition(&self) -> AppResult<EquipmentCondition> {
        self.condition_status.parse()
    }
}

/// Equipment query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    pub availability: Option<EquipmentAvailability>,
    pub equipment_type: Option<String>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 2, message = "Asset tag must be at least 2 characters"))]
    pub asset_tag: String,
    #[validate(length(min = 1, message = "Equipment type is required"))]
    pub equipment_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub condition_status: Option<EquipmentCondition>,
    pub notes: Option<String>,
}

/// Update equipment request
///
/// Availability can only be set to available/under_maintenance/retired
/// here; on_loan and missing are owned by the issuance and return paths.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    pub asset_tag: Option<String>,
    pub equipment_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub condition_status: Option<EquipmentCondition>,
    pub availability_status: Option<EquipmentAvailability>,
    pub notes: Option<String>,
}
