//! Dashboard statistics service

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

use crate::{
    error::AppResult,
    models::stats::{DailyScanCount, StatsResponse, StatsSummary, TopTaxi},
    repository::Repository,
};

pub const TOP_TAXIS_LIMIT: i64 = 10;
pub const SCAN_HISTORY_DAYS: i64 = 7;

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Compute the dashboard statistics
    pub async fn dashboard(&self) -> AppResult<StatsResponse> {
        let now = Utc::now();
        let stats = &self.repository.stats;

        let (total_taxis, total_customers, total_scans, purchased_customers, today_scans, daily, top) =
            tokio::try_join!(
                stats.count_taxis(),
                stats.count_customers(),
                stats.count_scans(),
                stats.count_purchased_customers(),
                stats.count_scans_since(start_of_day(now)),
                stats.daily_scan_counts(now - Duration::days(SCAN_HISTORY_DAYS)),
                stats.top_taxis(TOP_TAXIS_LIMIT),
            )?;

        Ok(StatsResponse {
            stats: StatsSummary {
                total_taxis,
                total_customers,
                total_scans,
                purchased_customers,
                today_scans,
                conversion_rate: conversion_rate(purchased_customers, total_customers),
            },
            scans_by_day: daily
                .into_iter()
                .map(|DailyScanCount { day, scan_count }| (day, scan_count))
                .collect(),
            top_taxis: top.into_iter().map(TopTaxi::from).collect(),
        })
    }
}

/// Midnight UTC of the given instant's day
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN))
}

/// Purchased customers as a percentage of all customers, one decimal.
///
/// Halves round away from zero (6.25 -> "6.3"), not to even.
pub fn conversion_rate(purchased: i64, customers: i64) -> String {
    if customers <= 0 {
        return "0.0".to_string();
    }
    let tenths = (purchased as f64 * 1000.0 / customers as f64).round();
    format!("{:.1}", tenths / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stats::TaxiScanCount;

    #[test]
    fn test_conversion_rate() {
        assert_eq!(conversion_rate(0, 0), "0.0");
        assert_eq!(conversion_rate(0, 12), "0.0");
        assert_eq!(conversion_rate(1, 3), "33.3");
        assert_eq!(conversion_rate(2, 3), "66.7");
        assert_eq!(conversion_rate(5, 5), "100.0");
    }

    #[test]
    fn test_conversion_rate_rounds_halves_up() {
        assert_eq!(conversion_rate(1, 16), "6.3");
        assert_eq!(conversion_rate(1, 80), "1.3");
        assert_eq!(conversion_rate(1, 400), "0.3");
        assert_eq!(conversion_rate(3, 16), "18.8");
    }

    #[test]
    fn test_start_of_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 17, 45, 12).unwrap();
        assert_eq!(
            start_of_day(now),
            Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_top_taxi_plate_placeholder() {
        let top = TopTaxi::from(TaxiScanCount {
            taxi_code: "TAXI001".to_string(),
            plate_number: None,
            scan_count: 42,
        });
        assert_eq!(top.plate, "-");
        assert_eq!(top.count, 42);

        let top = TopTaxi::from(TaxiScanCount {
            taxi_code: "TAXI002".to_string(),
            plate_number: Some("1กข 1234".to_string()),
            scan_count: 3,
        });
        assert_eq!(top.plate, "1กข 1234");
    }
}
