//! Campaign statistics models

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Scan volume of one taxi
#[derive(Debug, Clone, FromRow)]
pub struct TaxiScanCount {
    pub taxi_code: String,
    pub plate_number: Option<String>,
    pub scan_count: i64,
}

/// Scans on one UTC calendar day
#[derive(Debug, Clone, FromRow)]
pub struct DailyScanCount {
    /// YYYY-MM-DD
    pub day: String,
    pub scan_count: i64,
}

/// Headline counters
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_taxis: i64,
    pub total_customers: i64,
    pub total_scans: i64,
    pub purchased_customers: i64,
    pub today_scans: i64,
    /// Purchased customers over all customers, in percent with one decimal
    pub conversion_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TopTaxi {
    pub code: String,
    /// Plate number, or "-" when unknown
    pub plate: String,
    pub count: i64,
}

impl From<TaxiScanCount> for TopTaxi {
    fn from(row: TaxiScanCount) -> Self {
        Self {
            code: row.taxi_code,
            plate: row
                .plate_number
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "-".to_string()),
            count: row.scan_count,
        }
    }
}

/// Dashboard statistics response
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub stats: StatsSummary,
    /// Scans per UTC day over the last 7 days
    pub scans_by_day: BTreeMap<String, i64>,
    /// Ten most scanned taxis
    pub top_taxis: Vec<TopTaxi>,
}
