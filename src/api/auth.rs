//! Admin session endpoints

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    error::AppResult,
    models::session::{LoginRequest, SessionStatus, SuccessResponse, SESSION_COOKIE},
    AppState,
};

use super::AdminSession;

/// Log in with the admin password
#[utoipa::path(
    post,
    path = "/auth",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie set", body = SuccessResponse),
        (status = 401, description = "Invalid password", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<SuccessResponse>)> {
    let token = state.services.session.login(&request.password)?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(state.config.admin.secure_cookie)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(state.services.session.session_days()))
        .build();

    tracing::info!("Admin logged in");

    Ok((jar.add(cookie), Json(SuccessResponse { success: true })))
}

/// Check the admin session
#[utoipa::path(
    get,
    path = "/auth",
    tag = "auth",
    responses(
        (status = 200, description = "Session is valid", body = SessionStatus),
        (status = 401, description = "No valid session", body = SessionStatus)
    )
)]
pub async fn check(session: Option<AdminSession>) -> (StatusCode, Json<SessionStatus>) {
    match session {
        Some(_) => (StatusCode::OK, Json(SessionStatus { authenticated: true })),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(SessionStatus { authenticated: false }),
        ),
    }
}

/// Log out
#[utoipa::path(
    delete,
    path = "/auth",
    tag = "auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = SuccessResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(SuccessResponse { success: true }))
}
