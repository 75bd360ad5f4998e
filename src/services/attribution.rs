//! Scan recording and rider registration
//!
//! A QR scan cannot know who the rider is: identity only arrives after the
//! LIFF login round-trip. The recorder therefore writes an anonymous scan
//! with a fresh token and forwards that token through the mini-app URL; the
//! registrar later claims the scan carrying the token. Clients that do not
//! forward the token fall back to the most recent anonymous scan of the taxi.

use std::sync::Arc;

use url::Url;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::LiffConfig,
    error::{AppError, AppResult},
    models::{
        normalize_taxi_code, NewScan, RegisterResponse, RegisterVisitor, Scan, ScanAttribution,
        Taxi, VisitorProfile,
    },
    repository::AttributionStore,
    services::line::LineAuthClient,
};

const UNKNOWN_IP: &str = "unknown";

/// Result of a recorded scan
#[derive(Debug, Clone)]
pub struct ScanRedirect {
    /// Mini-app entry URL carrying `taxi` and `scan` query parameters
    pub location: String,
    pub scan: Scan,
}

#[derive(Clone)]
pub struct AttributionService {
    store: Arc<dyn AttributionStore>,
    liff: LiffConfig,
    verifier: Option<LineAuthClient>,
}

impl AttributionService {
    pub fn new(
        store: Arc<dyn AttributionStore>,
        liff: LiffConfig,
        verifier: Option<LineAuthClient>,
    ) -> Self {
        Self { store, liff, verifier }
    }

    /// Record an anonymous scan of an active taxi and build the mini-app redirect
    pub async fn record_scan(
        &self,
        code: &str,
        user_agent: Option<&str>,
        client_ip: Option<&str>,
    ) -> AppResult<ScanRedirect> {
        let taxi = match normalize_taxi_code(code) {
            Ok(code) => self.store.find_taxi_by_code(&code).await?,
            Err(_) => None,
        }
        .ok_or_else(|| AppError::NotFound("Taxi not found".to_string()))?;

        if !taxi.is_active {
            return Err(AppError::Gone("This QR code is inactive".to_string()));
        }

        let new_scan = NewScan {
            taxi_id: taxi.id,
            scan_token: Uuid::new_v4(),
            user_agent: user_agent.unwrap_or_default().to_string(),
            ip_address: client_ip
                .filter(|ip| !ip.is_empty())
                .unwrap_or(UNKNOWN_IP)
                .to_string(),
        };

        // A bad entry URL must fail before anything is written
        let location = self.entry_url(&taxi.taxi_code, new_scan.scan_token)?;
        let scan = self.store.insert_scan(&new_scan).await?;

        tracing::info!(taxi_code = %taxi.taxi_code, scan_id = %scan.id, "Scan recorded");

        Ok(ScanRedirect { location, scan })
    }

    /// Create or update the customer behind a mini-app login and attribute the visit
    pub async fn register_visitor(&self, request: RegisterVisitor) -> AppResult<RegisterResponse> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let line_user_id = request
            .visitor_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Validation("LINE User ID is required".to_string()))?;

        let mut profile = VisitorProfile {
            line_user_id: line_user_id.to_string(),
            display_name: request.display_name.clone(),
            picture_url: request.avatar_url.clone(),
        };

        if let Some(verifier) = &self.verifier {
            let id_token = request
                .id_token
                .as_deref()
                .ok_or_else(|| AppError::Authentication("LINE ID token is required".to_string()))?;
            let verified = verifier.verify_id_token(id_token).await?;
            if verified.sub != profile.line_user_id {
                return Err(AppError::Authentication(
                    "LINE ID token does not match the visitor".to_string(),
                ));
            }
            profile.display_name = profile.display_name.or(verified.name);
            profile.picture_url = profile.picture_url.or(verified.picture);
        }

        let taxi = match request.taxi_code.as_deref() {
            Some(code) => self.resolve_taxi(code).await?,
            None => None,
        };
        let taxi_id = taxi.as_ref().map(|t| t.id);

        if self.store.find_customer(&profile.line_user_id).await?.is_none() {
            let attribution = taxi_id.map(|taxi_id| match request.scan_token {
                Some(token) => ScanAttribution::ClaimToken { taxi_id, token },
                None => ScanAttribution::ClaimLatestAnonymous { taxi_id },
            });

            if self
                .store
                .create_customer(&profile, taxi_id, attribution)
                .await?
                .is_some()
            {
                tracing::info!(
                    line_user_id = %profile.line_user_id,
                    taxi_code = taxi.as_ref().map(|t| t.taxi_code.as_str()),
                    "Customer registered"
                );
                return Ok(self.response(true, "Customer registered"));
            }

            tracing::debug!(
                line_user_id = %profile.line_user_id,
                "Customer created concurrently, recording as returning visit"
            );
        }

        let attribution = taxi_id.map(|taxi_id| match request.scan_token {
            Some(token) => ScanAttribution::ClaimToken { taxi_id, token },
            None => ScanAttribution::InsertIdentified { taxi_id },
        });
        let customer = self.store.record_return_visit(&profile, attribution).await?;

        tracing::info!(
            line_user_id = %customer.line_user_id,
            total_scans = customer.total_scans,
            "Customer updated"
        );

        Ok(self.response(false, "Customer updated"))
    }

    /// Unknown or malformed codes are not an error here: attribution is omitted
    async fn resolve_taxi(&self, code: &str) -> AppResult<Option<Taxi>> {
        let Ok(code) = normalize_taxi_code(code) else {
            return Ok(None);
        };
        let taxi = self.store.find_taxi_by_code(&code).await?;
        if taxi.is_none() {
            tracing::debug!(taxi_code = %code, "Registration for unknown taxi code");
        }
        Ok(taxi)
    }

    /// Mini-app entry URL for a recorded scan
    pub fn entry_url(&self, taxi_code: &str, scan_token: Uuid) -> AppResult<String> {
        let base = match self.liff.liff_id.as_deref().filter(|id| !id.is_empty()) {
            Some(liff_id) => format!("https://liff.line.me/{}", liff_id),
            None => format!("{}/liff", self.liff.base_url.trim_end_matches('/')),
        };

        let mut url = Url::parse(&base)
            .map_err(|e| AppError::Internal(format!("Invalid mini-app URL '{}': {}", base, e)))?;
        url.query_pairs_mut()
            .append_pair("taxi", taxi_code)
            .append_pair("scan", &scan_token.to_string());

        Ok(url.into())
    }

    /// LINE official account the rider is forwarded to after registration
    pub fn messaging_destination(&self) -> Option<String> {
        self.liff
            .line_oa_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| format!("https://line.me/R/ti/p/{}", id))
    }

    fn response(&self, is_new_customer: bool, message: &str) -> RegisterResponse {
        RegisterResponse {
            success: true,
            is_new_customer,
            message: message.to_string(),
            redirect_url: self.messaging_destination(),
        }
    }
}
