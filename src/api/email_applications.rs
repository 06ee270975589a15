//! Email application endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::approval::{Approvable, Approval, DecisionRequest},
    models::email_application::{EmailApplication, EmailApplicationDraft, SubmitEmailApplication},
    workflow::ApplicationStatus,
};

use super::AuthenticatedUser;

/// Application list filters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ApplicationListQuery {
    /// Filter by workflow status
    pub status: Option<ApplicationStatus>,
    /// Officers and admins may list everyone's applications
    pub all: Option<bool>,
}

/// List email applications
#[utoipa::path(
    get,
    path = "/email-applications",
    tag = "email-applications",
    security(("bearer_auth" = [])),
    params(ApplicationListQuery),
    responses(
        (status = 200, description = "Email applications", body = Vec<EmailApplication>)
    )
)]
pub async fn list_email_applications(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ApplicationListQuery>,
) -> AppResult<Json<Vec<EmailApplication>>> {
    let applications = state
        .services
        .email_applications
        .list(&claims, query.status, query.all.unwrap_or(false))
        .await?;
    Ok(Json(applications))
}

/// Get one email application
#[utoipa::path(
    get,
    path = "/email-applications/{id}",
    tag = "email-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Email application", body = EmailApplication),
        (status = 404, description = "Application not found")
    )
)]
pub async fn get_email_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EmailApplication>> {
    let application = state.services.email_applications.get(id, &claims).await?;
    Ok(Json(application))
}

/// Create a draft email application
#[utoipa::path(
    post,
    path = "/email-applications",
    tag = "email-applications",
    security(("bearer_auth" = [])),
    request_body = EmailApplicationDraft,
    responses(
        (status = 201, description = "Draft created", body = EmailApplication)
    )
)]
pub async fn create_email_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(draft): Json<EmailApplicationDraft>,
) -> AppResult<(StatusCode, Json<EmailApplication>)> {
    let application = state
        .services
        .email_applications
        .create_draft(&claims, &draft)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// Update a draft email application
#[utoipa::path(
    put,
    path = "/email-applications/{id}",
    tag = "email-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    request_body = EmailApplicationDraft,
    responses(
        (status = 200, description = "Draft updated", body = EmailApplication),
        (status = 422, description = "Application is no longer a draft")
    )
)]
pub async fn update_email_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(draft): Json<EmailApplicationDraft>,
) -> AppResult<Json<EmailApplication>> {
    let application = state
        .services
        .email_applications
        .update_draft(id, &claims, &draft)
        .await?;
    Ok(Json(application))
}

/// Submit an email application into the approval workflow
#[utoipa::path(
    post,
    path = "/email-applications/{id}/submit",
    tag = "email-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    request_body = SubmitEmailApplication,
    responses(
        (status = 200, description = "Application submitted", body = EmailApplication),
        (status = 400, description = "Validation failed"),
        (status = 422, description = "Application is not a draft")
    )
)]
pub async fn submit_email_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<SubmitEmailApplication>,
) -> AppResult<Json<EmailApplication>> {
    let application = state
        .services
        .email_applications
        .submit(id, &claims, &payload)
        .await?;
    Ok(Json(application))
}

/// Cancel an email application before a decision is made
#[utoipa::path(
    post,
    path = "/email-applications/{id}/cancel",
    tag = "email-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application cancelled", body = EmailApplication),
        (status = 422, description = "Application can no longer be cancelled")
    )
)]
pub async fn cancel_email_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EmailApplication>> {
    let application = state.services.email_applications.cancel(id, &claims).await?;
    Ok(Json(application))
}

/// Record an officer decision on an email application
#[utoipa::path(
    post,
    path = "/email-applications/{id}/decision",
    tag = "email-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decision recorded", body = Approval),
        (status = 403, description = "Not permitted for this stage"),
        (status = 422, description = "Application is not awaiting a decision")
    )
)]
pub async fn decide_email_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<DecisionRequest>,
) -> AppResult<Json<Approval>> {
    let approval = state
        .services
        .approvals
        .record_decision(Approvable::Email(id), &claims, request.decision, request.comments)
        .await?;
    Ok(Json(approval))
}

/// Provision the mailbox for an approved application
#[utoipa::path(
    post,
    path = "/email-applications/{id}/provision",
    tag = "email-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Provisioning outcome recorded", body = EmailApplication),
        (status = 422, description = "Application is not approved")
    )
)]
pub async fn provision_email_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EmailApplication>> {
    let application = state.services.email_applications.provision(id, &claims).await?;
    Ok(Json(application))
}

/// Approval history of an email application
#[utoipa::path(
    get,
    path = "/email-applications/{id}/approvals",
    tag = "email-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Approval history", body = Vec<Approval>)
    )
)]
pub async fn list_email_application_approvals(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Approval>>> {
    // Visibility follows the application itself
    state.services.email_applications.get(id, &claims).await?;
    let approvals = state.services.approvals.list_for(Approvable::Email(id)).await?;
    Ok(Json(approvals))
}

/// Soft-delete a draft email application
#[utoipa::path(
    delete,
    path = "/email-applications/{id}",
    tag = "email-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 204, description = "Draft deleted"),
        (status = 422, description = "Only drafts can be deleted")
    )
)]
pub async fn delete_email_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.email_applications.delete_draft(id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
