//! Leave request model (daily or hourly)

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::enums::{LeaveStatus, LeaveType};
use crate::workflow::ApprovalDecision;

/// Leave request record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: i32,
    pub employee_id: i32,
    /// annual, medical, emergency, unpaid, other
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Both set for hourly leave, both NULL for daily leave
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "12:30:00")]
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
    /// pending, approved, rejected, cancelled
    pub status: String,
    pub decided_by: Option<i32>,
    pub decision_note: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaveRequest {
    pub fn leave_status(&self) -> AppResult<LeaveStatus> {
        self.status.parse()
    }
}

/// Create leave request payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLeaveRequest {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "12:30:00")]
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
}

/// Officer decision on a leave request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveDecisionRequest {
    pub decision: ApprovalDecision,
    pub note: Option<String>,
}

/// Time-window rules: daily leave spans whole days, hourly leave spans a
/// window inside one day.
pub fn validate_leave_window(payload: &CreateLeaveRequest) -> AppResult<()> {
    let mut errors: Vec<String> = Vec::new();

    match (payload.start_time, payload.end_time) {
        (None, None) => {
            if payload.end_date < payload.start_date {
                errors.push("end_date: End date must not precede the start date".to_string());
            }
        }
        (Some(start), Some(end)) => {
            if payload.start_date != payload.end_date {
                errors.push("end_date: Hourly leave must start and end on the same day".to_string());
            }
            if end <= start {
                errors.push("end_time: End time must be after the start time".to_string());
            }
        }
        _ => {
            errors.push("start_time: Hourly leave needs both a start and an end time".to_string());
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

    fn daily(start: (i32, u32, u32), end: (i32, u32, u32)) -> CreateLeaveRequest {
        CreateLeaveRequest {
            leave_type: LeaveType::Annual,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            start_time: None,
            end_time: None,
            reason: None,
        }
    }

    #[test]
    fn test_daily_window() {
        assert!(validate_leave_window(&daily((2026, 4, 6), (2026, 4, 8))).is_ok());
        assert!(validate_leave_window(&daily((2026, 4, 8), (2026, 4, 6))).is_err());
    }

    #[test]
    fn test_hourly_window_same_day() {
        let mut payload = daily((2026, 4, 6), (2026, 4, 6));
        payload.start_time = NaiveTime::from_hms_opt(9, 0, 0);
        payload.end_time = NaiveTime::from_hms_opt(12, 30, 0);
        assert!(validate_leave_window(&payload).is_ok());

        payload.end_time = NaiveTime::from_hms_opt(9, 0, 0);
        assert!(validate_leave_window(&payload).is_err());

        payload.end_time = NaiveTime::from_hms_opt(12, 30, 0);
        payload.end_date = NaiveDate::from_ymd_opt(2026, 4, 7).unwrap();
        assert!(validate_leave_window(&payload).is_err());
    }

    #[test]
    fn test_half_specified_times_rejected() {
        let mut payload = daily((2026, 4, 6), (2026, 4, 6));
        payload.start_time = NaiveTime::from_hms_opt(9, 0, 0);
        let err = validate_leave_window(&payload).unwrap_err();
        assert!(err.to_string().contains("start_time"));
    }
}
