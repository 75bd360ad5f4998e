//! Taxi model

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

static TAXI_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9_-]{1,32}$").expect("valid taxi code regex"));

/// Normalize a taxi code to its stored form (trimmed, upper-case) and check its format
pub fn normalize_taxi_code(code: &str) -> AppResult<String> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return Err(AppError::Validation("Taxi code is required".to_string()));
    }
    if !TAXI_CODE_RE.is_match(&code) {
        return Err(AppError::Validation(format!(
            "Invalid taxi code '{}': use up to 32 letters, digits, '-' or '_'",
            code
        )));
    }
    Ok(code)
}

/// A physical vehicle carrying a QR code
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Taxi {
    pub id: Uuid,
    /// Unique upper-case code printed in the QR target URL
    pub taxi_code: String,
    pub plate_number: Option<String>,
    pub driver_name: Option<String>,
    pub notes: Option<String>,
    /// Inactive taxis answer scans with 410 Gone
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create taxi request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaxi {
    /// Taxi code (case-insensitive, stored upper-case)
    #[validate(length(min = 1, message = "Taxi code is required"))]
    pub taxi_code: String,
    #[validate(length(max = 32, message = "Plate number must be at most 32 characters"))]
    pub plate_number: Option<String>,
    #[validate(length(max = 120, message = "Driver name must be at most 120 characters"))]
    pub driver_name: Option<String>,
    pub notes: Option<String>,
}

/// Update taxi request (all fields optional; the code itself cannot change)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTaxi {
    /// Accepted only when equal to the current code
    pub taxi_code: Option<String>,
    #[validate(length(max = 32, message = "Plate number must be at most 32 characters"))]
    pub plate_number: Option<String>,
    #[validate(length(max = 120, message = "Driver name must be at most 120 characters"))]
    pub driver_name: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing taxis
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct TaxiQuery {
    /// Only return active taxis
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaxiResponse {
    pub taxi: Taxi,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaxiListResponse {
    pub taxis: Vec<Taxi>,
}
