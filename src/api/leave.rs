//! Leave request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::enums::LeaveStatus,
    models::leave_request::{CreateLeaveRequest, LeaveDecisionRequest, LeaveRequest},
};

use super::AuthenticatedUser;

/// Leave list filters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LeaveListQuery {
    pub status: Option<LeaveStatus>,
    /// Officers and admins may list everyone's requests
    pub all: Option<bool>,
}

/// List leave requests
#[utoipa::path(
    get,
    path = "/leave-requests",
    tag = "leave",
    security(("bearer_auth" = [])),
    params(LeaveListQuery),
    responses(
        (status = 200, description = "Leave requests", body = Vec<LeaveRequest>)
    )
)]
pub async fn list_leave_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<LeaveListQuery>,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    let requests = state
        .services
        .leave
        .list(&claims, query.status, query.all.unwrap_or(false))
        .await?;
    Ok(Json(requests))
}

/// File a leave request
#[utoipa::path(
    post,
    path = "/leave-requests",
    tag = "leave",
    security(("bearer_auth" = [])),
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Leave request filed", body = LeaveRequest),
        (status = 400, description = "Invalid time window")
    )
)]
pub async fn create_leave_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateLeaveRequest>,
) -> AppResult<(StatusCode, Json<LeaveRequest>)> {
    let request = state.services.leave.create(&claims, &data).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Record an officer decision on a leave request
#[utoipa::path(
    post,
    path = "/leave-requests/{id}/decision",
    tag = "leave",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Leave request ID")),
    request_body = LeaveDecisionRequest,
    responses(
        (status = 200, description = "Decision recorded", body = LeaveRequest),
        (status = 422, description = "Request already decided")
    )
)]
pub async fn decide_leave_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<LeaveDecisionRequest>,
) -> AppResult<Json<LeaveRequest>> {
    let decided = state.services.leave.decide(id, &claims, &request).await?;
    Ok(Json(decided))
}

/// Withdraw a pending leave request
#[utoipa::path(
    post,
    path = "/leave-requests/{id}/cancel",
    tag = "leave",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Request cancelled", body = LeaveRequest),
        (status = 422, description = "Request is no longer pending")
    )
)]
pub async fn cancel_leave_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LeaveRequest>> {
    let cancelled = state.services.leave.cancel(id, &claims).await?;
    Ok(Json(cancelled))
}
