//! Employee model (HR master data)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Employee record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: i32,
    pub staff_number: String,
    pub firstname: String,
    pub lastname: String,
    pub work_email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub grade: Option<String>,
    pub position: Option<String>,
    /// Employment nature: permanent, contract, intern, agency
    pub service_status: String,
    pub is_active: bool,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub deleted_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Compact employee reference for embedding in other responses
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EmployeeShort {
    pub id: i32,
    pub staff_number: String,
    pub firstname: String,
    pub lastname: String,
    pub department: Option<String>,
}

/// Employee query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    pub name: Option<String>,
    pub department: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create employee request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEmployee {
    #[validate(length(min = 3, message = "Staff number must be at least 3 characters"))]
    pub staff_number: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub firstname: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub lastname: String,
    #[validate(email(message = "Invalid email format"))]
    pub work_email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub grade: Option<String>,
    pub position: Option<String>,
    pub service_status: Option<crate::models::enums::EmploymentStatus>,
}

/// Update employee request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployee {
    pub staff_number: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub work_email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub grade: Option<String>,
    pub position: Option<String>,
    pub service_status: Option<crate::models::enums::EmploymentStatus>,
    pub is_active: Option<bool>,
}
