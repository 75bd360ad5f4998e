//! LINE Login ID token verification

use std::time::Duration;

use serde::Deserialize;

use crate::{
    config::LineConfig,
    error::{AppError, AppResult},
};

/// Claims returned by the LINE verify endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LineIdToken {
    /// LINE user id
    pub sub: String,
    pub aud: String,
    pub exp: i64,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LineErrorBody {
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Clone)]
pub struct LineAuthClient {
    http: reqwest::Client,
    channel_id: String,
    verify_url: String,
}

impl LineAuthClient {
    /// Build a client when a LINE Login channel is configured
    pub fn from_config(config: &LineConfig) -> AppResult<Option<Self>> {
        let Some(channel_id) = config.channel_id.clone().filter(|id| !id.trim().is_empty()) else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Some(Self {
            http,
            channel_id,
            verify_url: config.verify_url.clone(),
        }))
    }

    /// Verify a LIFF ID token and return its claims
    pub async fn verify_id_token(&self, id_token: &str) -> AppResult<LineIdToken> {
        let response = self
            .http
            .post(&self.verify_url)
            .form(&[("id_token", id_token), ("client_id", self.channel_id.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("LINE verify request failed: {}", e)))?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.json::<LineErrorBody>().await.ok();
            let reason = body
                .and_then(|b| b.error_description.or(b.error))
                .unwrap_or_else(|| status.to_string());
            tracing::warn!("LINE ID token rejected: {}", reason);
            return Err(AppError::Authentication("Invalid LINE ID token".to_string()));
        }
        if !status.is_success() {
            return Err(AppError::Upstream(format!("LINE verify returned {}", status)));
        }

        let token = response
            .json::<LineIdToken>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid LINE verify response: {}", e)))?;

        if token.aud != self.channel_id {
            return Err(AppError::Authentication(
                "LINE ID token issued for another channel".to_string(),
            ));
        }

        Ok(token)
    }
}
