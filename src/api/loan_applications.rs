//! Loan application and equipment hand-off endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::approval::{Approvable, Approval, DecisionRequest},
    models::loan_application::{
        LoanApplication, LoanApplicationDetails, LoanApplicationDraft, SubmitLoanApplication,
    },
    models::loan_transaction::{IssueRequest, LoanTransaction, LoanTransactionDetails, ReturnRequest},
};

use super::email_applications::ApplicationListQuery;
use super::AuthenticatedUser;

/// List loan applications
#[utoipa::path(
    get,
    path = "/loan-applications",
    tag = "loan-applications",
    security(("bearer_auth" = [])),
    params(ApplicationListQuery),
    responses(
        (status = 200, description = "Loan applications", body = Vec<LoanApplication>)
    )
)]
pub async fn list_loan_applications(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ApplicationListQuery>,
) -> AppResult<Json<Vec<LoanApplication>>> {
    let applications = state
        .services
        .loan_applications
        .list(&claims, query.status, query.all.unwrap_or(false))
        .await?;
    Ok(Json(applications))
}

/// Get one loan application with its item lines
#[utoipa::path(
    get,
    path = "/loan-applications/{id}",
    tag = "loan-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Loan application", body = LoanApplicationDetails),
        (status = 404, description = "Application not found")
    )
)]
pub async fn get_loan_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanApplicationDetails>> {
    let details = state.services.loan_applications.get_details(id, &claims).await?;
    Ok(Json(details))
}

/// Create a draft loan application
#[utoipa::path(
    post,
    path = "/loan-applications",
    tag = "loan-applications",
    security(("bearer_auth" = [])),
    request_body = LoanApplicationDraft,
    responses(
        (status = 201, description = "Draft created", body = LoanApplication)
    )
)]
pub async fn create_loan_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(draft): Json<LoanApplicationDraft>,
) -> AppResult<(StatusCode, Json<LoanApplication>)> {
    let application = state
        .services
        .loan_applications
        .create_draft(&claims, &draft)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// Update a draft loan application (item lines are replaced)
#[utoipa::path(
    put,
    path = "/loan-applications/{id}",
    tag = "loan-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    request_body = LoanApplicationDraft,
    responses(
        (status = 200, description = "Draft updated", body = LoanApplication),
        (status = 422, description = "Application is no longer a draft")
    )
)]
pub async fn update_loan_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(draft): Json<LoanApplicationDraft>,
) -> AppResult<Json<LoanApplication>> {
    let application = state
        .services
        .loan_applications
        .update_draft(id, &claims, &draft)
        .await?;
    Ok(Json(application))
}

/// Submit a loan application into the approval workflow
#[utoipa::path(
    post,
    path = "/loan-applications/{id}/submit",
    tag = "loan-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    request_body = SubmitLoanApplication,
    responses(
        (status = 200, description = "Application submitted", body = LoanApplication),
        (status = 400, description = "Validation failed"),
        (status = 422, description = "Application is not a draft")
    )
)]
pub async fn submit_loan_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<SubmitLoanApplication>,
) -> AppResult<Json<LoanApplication>> {
    let application = state
        .services
        .loan_applications
        .submit(id, &claims, &payload)
        .await?;
    Ok(Json(application))
}

/// Cancel a loan application before a decision is made
#[utoipa::path(
    post,
    path = "/loan-applications/{id}/cancel",
    tag = "loan-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application cancelled", body = LoanApplication),
        (status = 422, description = "Application can no longer be cancelled")
    )
)]
pub async fn cancel_loan_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanApplication>> {
    let application = state.services.loan_applications.cancel(id, &claims).await?;
    Ok(Json(application))
}

/// Record an officer decision on a loan application
#[utoipa::path(
    post,
    path = "/loan-applications/{id}/decision",
    tag = "loan-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decision recorded", body = Approval),
        (status = 403, description = "Not permitted for this stage"),
        (status = 422, description = "Application is not awaiting a decision")
    )
)]
pub async fn decide_loan_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<DecisionRequest>,
) -> AppResult<Json<Approval>> {
    let approval = state
        .services
        .approvals
        .record_decision(Approvable::Loan(id), &claims, request.decision, request.comments)
        .await?;
    Ok(Json(approval))
}

/// Approval history of a loan application
#[utoipa::path(
    get,
    path = "/loan-applications/{id}/approvals",
    tag = "loan-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Approval history", body = Vec<Approval>)
    )
)]
pub async fn list_loan_application_approvals(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Approval>>> {
    // Visibility follows the application itself
    state.services.loan_applications.get_details(id, &claims).await?;
    let approvals = state.services.approvals.list_for(Approvable::Loan(id)).await?;
    Ok(Json(approvals))
}

/// Soft-delete a draft loan application
#[utoipa::path(
    delete,
    path = "/loan-applications/{id}",
    tag = "loan-applications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 204, description = "Draft deleted"),
        (status = 422, description = "Only drafts can be deleted")
    )
)]
pub async fn delete_loan_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.loan_applications.delete_draft(id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Issue equipment against an approved loan application
#[utoipa::path(
    post,
    path = "/loan-applications/{id}/issue",
    tag = "loan-transactions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    request_body = IssueRequest,
    responses(
        (status = 201, description = "Equipment issued", body = LoanTransaction),
        (status = 422, description = "Application not approved or equipment unavailable")
    )
)]
pub async fn issue_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<IssueRequest>,
) -> AppResult<(StatusCode, Json<LoanTransaction>)> {
    let transaction = state.services.issuance.issue(id, &claims, &request).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Hand-offs recorded for a loan application
#[utoipa::path(
    get,
    path = "/loan-applications/{id}/transactions",
    tag = "loan-transactions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Transactions", body = Vec<LoanTransactionDetails>)
    )
)]
pub async fn list_loan_transactions(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<LoanTransactionDetails>>> {
    let transactions = state.services.issuance.transactions_for(id, &claims).await?;
    Ok(Json(transactions))
}

/// Process the return of an outstanding transaction
#[utoipa::path(
    post,
    path = "/loan-transactions/{id}/return",
    tag = "loan-transactions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Transaction ID")),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Return recorded", body = LoanTransaction),
        (status = 422, description = "Transaction already closed")
    )
)]
pub async fn return_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<LoanTransaction>> {
    let transaction = state
        .services
        .issuance
        .process_return(id, &claims, &request)
        .await?;
    Ok(Json(transaction))
}

/// Outcome of an overdue sweep
#[derive(Serialize, ToSchema)]
pub struct FlagOverdueResponse {
    pub flagged: Vec<i32>,
}

/// Flag issued applications past their end date as overdue
#[utoipa::path(
    post,
    path = "/loan-applications/flag-overdue",
    tag = "loan-applications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overdue sweep completed", body = FlagOverdueResponse)
    )
)]
pub async fn flag_overdue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<FlagOverdueResponse>> {
    let flagged = state.services.issuance.flag_overdue(&claims).await?;
    Ok(Json(FlagOverdueResponse { flagged }))
}
