//! Repository layer for database operations

pub mod attribution;
pub mod customers;
pub mod scans;
pub mod stats;
pub mod taxis;

use sqlx::{Pool, Postgres};

pub use attribution::AttributionStore;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub taxis: taxis::TaxisRepository,
    pub customers: customers::CustomersRepository,
    pub scans: scans::ScansRepository,
    pub stats: stats::StatsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            taxis: taxis::TaxisRepository::new(pool.clone()),
            customers: customers::CustomersRepository::new(pool.clone()),
            scans: scans::ScansRepository::new(pool.clone()),
            stats: stats::StatsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database (readiness probe)
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
