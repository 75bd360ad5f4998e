//! Scan model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One visit to a taxi's QR code
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Scan {
    pub id: Uuid,
    pub taxi_id: Option<Uuid>,
    /// Visitor identity, back-filled once the rider registers
    pub line_user_id: Option<String>,
    /// Correlation token carried through the mini-app redirect
    pub scan_token: Option<Uuid>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

/// Anonymous scan written by the QR redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScan {
    pub taxi_id: Uuid,
    pub scan_token: Uuid,
    pub user_agent: String,
    pub ip_address: String,
}

/// How a registration attaches the visit to a scan row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAttribution {
    /// Claim the anonymous scan issued with this token
    ClaimToken { taxi_id: Uuid, token: Uuid },
    /// Claim the most recent anonymous scan of the taxi
    ClaimLatestAnonymous { taxi_id: Uuid },
    /// Write a new scan row already carrying the visitor
    InsertIdentified { taxi_id: Uuid },
}

impl ScanAttribution {
    pub fn taxi_id(&self) -> Uuid {
        match *self {
            ScanAttribution::ClaimToken { taxi_id, .. }
            | ScanAttribution::ClaimLatestAnonymous { taxi_id }
            | ScanAttribution::InsertIdentified { taxi_id } => taxi_id,
        }
    }
}
