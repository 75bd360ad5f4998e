//! QR code redirect endpoint

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{error::AppResult, AppState};

/// First address of `X-Forwarded-For`, if any
pub fn forwarded_client_ip(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    if first.is_empty() {
        return None;
    }
    Some(first.to_string())
}

/// Record a scan and redirect into the mini-app
#[utoipa::path(
    get,
    path = "/t/{taxi_code}",
    tag = "scan",
    params(("taxi_code" = String, Path, description = "Taxi code printed in the QR code (case-insensitive)")),
    responses(
        (status = 302, description = "Redirect to the LIFF mini-app with taxi and scan token"),
        (status = 404, description = "Taxi not found", body = crate::error::ErrorResponse),
        (status = 410, description = "QR code is inactive", body = crate::error::ErrorResponse)
    )
)]
pub async fn scan_redirect(
    State(state): State<AppState>,
    Path(taxi_code): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let client_ip = forwarded_client_ip(&headers);

    let redirect = state
        .services
        .attribution
        .record_scan(&taxi_code, user_agent, client_ip.as_deref())
        .await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, redirect.location)]).into_response())
}
