//! Mini-app registration endpoint

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::customer::{RegisterResponse, RegisterVisitor},
    AppState,
};

/// Register the rider behind a LIFF login and attribute the scan
#[utoipa::path(
    post,
    path = "/liff/register",
    tag = "liff",
    request_body = RegisterVisitor,
    responses(
        (status = 200, description = "Customer registered or updated", body = RegisterResponse),
        (status = 400, description = "Visitor id missing", body = crate::error::ErrorResponse),
        (status = 401, description = "LINE ID token rejected", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterVisitor>,
) -> AppResult<Json<RegisterResponse>> {
    let response = state.services.attribution.register_visitor(request).await?;
    Ok(Json(response))
}
