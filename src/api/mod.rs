//! API handlers for the Taxi QR endpoints

pub mod auth;
pub mod customers;
pub mod health;
pub mod liff;
pub mod openapi;
pub mod scan;
pub mod stats;
pub mod taxis;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::{error::AppError, models::session::{AdminClaims, SESSION_COOKIE}, AppState};

/// Extractor for a valid admin session cookie
pub struct AdminSession(pub AdminClaims);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Authentication("Missing admin session".to_string()))?;

        let claims = state.services.session.verify(&token)?;

        Ok(AdminSession(claims))
    }
}
