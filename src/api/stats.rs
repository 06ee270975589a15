//! Statistics endpoint

use axum::{extract::State, Json};

use crate::error::AppResult;

pub use crate::services::stats::{StatsResponse, StatusCount};

use super::AuthenticatedUser;

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregated counts", body = StatsResponse)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.overview(&claims).await?;
    Ok(Json(stats))
}
