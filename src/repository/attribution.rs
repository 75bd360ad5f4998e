//! Storage seam of the scan attribution flow

use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{Customer, NewScan, Scan, ScanAttribution, Taxi, VisitorProfile},
};

/// Reads and writes performed by the scan recorder and identity registrar.
///
/// Customer writes and the scan attribution they account for are applied
/// atomically: either both land or neither does.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttributionStore: Send + Sync {
    /// Look up a taxi by its normalized code
    async fn find_taxi_by_code(&self, code: &str) -> AppResult<Option<Taxi>>;

    /// Append an anonymous scan
    async fn insert_scan(&self, scan: &NewScan) -> AppResult<Scan>;

    async fn find_customer(&self, line_user_id: &str) -> AppResult<Option<Customer>>;

    /// Insert a customer with `total_scans = 1` and claim the given scan.
    ///
    /// Returns `None` without writing anything when the customer already exists.
    async fn create_customer(
        &self,
        profile: &VisitorProfile,
        first_taxi_id: Option<Uuid>,
        attribution: Option<ScanAttribution>,
    ) -> AppResult<Option<Customer>>;

    /// Refresh the profile, increment `total_scans` and attribute the visit.
    ///
    /// A token claim that matches no anonymous scan records a new identified
    /// scan instead, so every counted visit has a scan row.
    async fn record_return_visit(
        &self,
        profile: &VisitorProfile,
        attribution: Option<ScanAttribution>,
    ) -> AppResult<Customer>;
}

/// Attach the visitor to a scan row; returns whether a row was written
async fn attach_scan(
    conn: &mut PgConnection,
    line_user_id: &str,
    attribution: ScanAttribution,
) -> AppResult<bool> {
    let result = match attribution {
        ScanAttribution::ClaimToken { taxi_id, token } => {
            sqlx::query(
                r#"
                UPDATE scans SET line_user_id = $1
                WHERE scan_token = $2 AND taxi_id = $3 AND line_user_id IS NULL
                "#,
            )
            .bind(line_user_id)
            .bind(token)
            .bind(taxi_id)
            .execute(&mut *conn)
            .await?
        }
        ScanAttribution::ClaimLatestAnonymous { taxi_id } => {
            sqlx::query(
                r#"
                UPDATE scans SET line_user_id = $1
                WHERE id = (
                    SELECT id FROM scans
                    WHERE taxi_id = $2 AND line_user_id IS NULL
                    ORDER BY scanned_at DESC
                    LIMIT 1
                    FOR UPDATE SKIP LOCKED
                )
                "#,
            )
            .bind(line_user_id)
            .bind(taxi_id)
            .execute(&mut *conn)
            .await?
        }
        ScanAttribution::InsertIdentified { taxi_id } => {
            sqlx::query("INSERT INTO scans (taxi_id, line_user_id) VALUES ($1, $2)")
                .bind(taxi_id)
                .bind(line_user_id)
                .execute(&mut *conn)
                .await?
        }
    };
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl AttributionStore for Repository {
    async fn find_taxi_by_code(&self, code: &str) -> AppResult<Option<Taxi>> {
        self.taxis.get_by_code(code).await
    }

    async fn insert_scan(&self, scan: &NewScan) -> AppResult<Scan> {
        self.scans.insert(scan).await
    }

    async fn find_customer(&self, line_user_id: &str) -> AppResult<Option<Customer>> {
        self.customers.get(line_user_id).await
    }

    async fn create_customer(
        &self,
        profile: &VisitorProfile,
        first_taxi_id: Option<Uuid>,
        attribution: Option<ScanAttribution>,
    ) -> AppResult<Option<Customer>> {
        let mut tx = self.pool.begin().await?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (line_user_id, display_name, picture_url, first_taxi_id, total_scans, has_purchased)
            VALUES ($1, $2, $3, $4, 1, FALSE)
            ON CONFLICT (line_user_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&profile.line_user_id)
        .bind(&profile.display_name)
        .bind(&profile.picture_url)
        .bind(first_taxi_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(customer) = customer else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(attribution) = attribution {
            let attached = attach_scan(&mut *tx, &profile.line_user_id, attribution).await?;
            if !attached {
                tracing::debug!(
                    line_user_id = %profile.line_user_id,
                    ?attribution,
                    "No anonymous scan to back-fill"
                );
            }
        }

        tx.commit().await?;
        Ok(Some(customer))
    }

    async fn record_return_visit(
        &self,
        profile: &VisitorProfile,
        attribution: Option<ScanAttribution>,
    ) -> AppResult<Customer> {
        let mut tx = self.pool.begin().await?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET display_name = COALESCE($2, display_name),
                picture_url = COALESCE($3, picture_url),
                total_scans = total_scans + 1,
                updated_at = NOW()
            WHERE line_user_id = $1
            RETURNING *
            "#,
        )
        .bind(&profile.line_user_id)
        .bind(&profile.display_name)
        .bind(&profile.picture_url)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

        if let Some(attribution) = attribution {
            let attached = attach_scan(&mut *tx, &profile.line_user_id, attribution).await?;
            if !attached {
                let fallback = ScanAttribution::InsertIdentified {
                    taxi_id: attribution.taxi_id(),
                };
                attach_scan(&mut *tx, &profile.line_user_id, fallback).await?;
            }
        }

        tx.commit().await?;
        Ok(customer)
    }
}
