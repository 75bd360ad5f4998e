//! Statistics endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, models::stats::StatsResponse, AppState};

use super::AdminSession;

/// Campaign statistics: totals, conversion, 7-day histogram, top taxis
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = StatsResponse),
        (status = 401, description = "No admin session", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    _session: AdminSession,
) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.dashboard().await?;
    Ok(Json(stats))
}
