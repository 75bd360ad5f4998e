//! Scans repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::scan::{NewScan, Scan},
};

#[derive(Clone)]
pub struct ScansRepository {
    pool: Pool<Postgres>,
}

impl ScansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append an anonymous scan
    pub async fn insert(&self, scan: &NewScan) -> AppResult<Scan> {
        let row = sqlx::query_as::<_, Scan>(
            r#"
            INSERT INTO scans (taxi_id, scan_token, user_agent, ip_address)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(scan.taxi_id)
        .bind(scan.scan_token)
        .bind(&scan.user_agent)
        .bind(&scan.ip_address)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Scans of one taxi, newest first
    pub async fn list_for_taxi(&self, taxi_id: Uuid, limit: i64) -> AppResult<Vec<Scan>> {
        let rows = sqlx::query_as::<_, Scan>(
            "SELECT * FROM scans WHERE taxi_id = $1 ORDER BY scanned_at DESC LIMIT $2",
        )
        .bind(taxi_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
