//! Statistics queries

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::stats::{DailyScanCount, TaxiScanCount},
};

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn count_taxis(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM taxis")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_customers(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_purchased_customers(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE has_purchased = TRUE")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn count_scans(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scans")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_scans_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scans WHERE scanned_at >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Scan counts grouped by UTC day since the given instant
    pub async fn daily_scan_counts(&self, since: DateTime<Utc>) -> AppResult<Vec<DailyScanCount>> {
        let rows = sqlx::query_as::<_, DailyScanCount>(
            r#"
            SELECT to_char(scanned_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS day,
                   COUNT(*) AS scan_count
            FROM scans
            WHERE scanned_at >= $1
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Taxis ranked by number of scans
    pub async fn top_taxis(&self, limit: i64) -> AppResult<Vec<TaxiScanCount>> {
        let rows = sqlx::query_as::<_, TaxiScanCount>(
            r#"
            SELECT t.taxi_code, t.plate_number, COUNT(s.id) AS scan_count
            FROM scans s
            JOIN taxis t ON t.id = s.taxi_id
            GROUP BY t.id, t.taxi_code, t.plate_number
            ORDER BY scan_count DESC, t.taxi_code
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
