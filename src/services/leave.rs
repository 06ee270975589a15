//! Leave request service
//!
//! Single-stage decisions; the time-window rules live with the model so
//! they can be tested without a database.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::claims::UserClaims,
    models::enums::LeaveStatus,
    models::leave_request::{
        validate_leave_window, CreateLeaveRequest, LeaveDecisionRequest, LeaveRequest,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LeaveService {
    repository: Repository,
}

impl LeaveService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Requests visible to the caller: their own, or everyone's for
    /// officers and admins
    pub async fn list(
        &self,
        claims: &UserClaims,
        status: Option<LeaveStatus>,
        all: bool,
    ) -> AppResult<Vec<LeaveRequest>> {
        claims.require_read_leave()?;
        let employee_id = if all && (claims.is_admin || claims.require_approvals().is_ok()) {
            None
        } else {
            Some(claims.employee_id)
        };
        self.repository.leave_requests.list(employee_id, status).await
    }

    /// File a leave request; it enters the queue already validated
    pub async fn create(
        &self,
        claims: &UserClaims,
        data: &CreateLeaveRequest,
    ) -> AppResult<LeaveRequest> {
        claims.require_write_leave()?;
        validate_leave_window(data)?;
        self.repository.employees.get_by_id(claims.employee_id).await?;
        self.repository.leave_requests.create(claims.employee_id, data).await
    }

    /// Record an officer decision on a pending request
    pub async fn decide(
        &self,
        id: i32,
        claims: &UserClaims,
        request: &LeaveDecisionRequest,
    ) -> AppResult<LeaveRequest> {
        claims.require_approvals()?;
        // Existence first, so an absent id reads as NotFound rather than
        // a state conflict
        self.repository.leave_requests.get_by_id(id).await?;

        self.repository
            .leave_requests
            .decide(
                id,
                request.decision,
                claims.employee_id,
                request.note.as_deref(),
                Utc::now(),
            )
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(format!("Leave request {} has already been decided", id))
            })
    }

    /// Withdraw a pending request
    pub async fn cancel(&self, id: i32, claims: &UserClaims) -> AppResult<LeaveRequest> {
        claims.require_write_leave()?;
        let request = self.repository.leave_requests.get_by_id(id).await?;
        if request.employee_id != claims.employee_id {
            return Err(AppError::Authorization(
                "Only the requester may cancel a leave request".to_string(),
            ));
        }

        self.repository
            .leave_requests
            .cancel(id)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(format!(
                    "Leave request {} is no longer pending and cannot be cancelled",
                    id
                ))
            })
    }
}
