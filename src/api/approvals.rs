//! Officer approval queue

use axum::{extract::State, Json};

use crate::{error::AppResult, models::approval::Approval};

use super::AuthenticatedUser;

/// Decision tasks waiting on the calling officer, including unassigned
/// admin-stage tasks
#[utoipa::path(
    get,
    path = "/approvals/pending",
    tag = "approvals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending decision tasks", body = Vec<Approval>),
        (status = 403, description = "Caller is not an officer")
    )
)]
pub async fn list_pending_approvals(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Approval>>> {
    let approvals = state.services.approvals.pending_for(&claims).await?;
    Ok(Json(approvals))
}
