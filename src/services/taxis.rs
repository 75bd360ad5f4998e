//! Taxi management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        scan::Scan,
        taxi::{normalize_taxi_code, CreateTaxi, Taxi, UpdateTaxi},
    },
    repository::Repository,
};

/// Number of scans returned by the per-taxi scan history
pub const RECENT_SCANS_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct TaxisService {
    repository: Repository,
}

impl TaxisService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List taxis, optionally only the active ones
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<Taxi>> {
        self.repository.taxis.list(active_only).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Taxi> {
        self.repository.taxis.get_by_id(id).await
    }

    /// Create a taxi; the code is stored upper-case and must be unique
    pub async fn create(&self, data: &CreateTaxi) -> AppResult<Taxi> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let code = normalize_taxi_code(&data.taxi_code)?;

        let taxi = self.repository.taxis.create(&code, data).await?;
        tracing::info!(taxi_code = %taxi.taxi_code, taxi_id = %taxi.id, "Taxi created");
        Ok(taxi)
    }

    /// Update plate, driver, notes or active flag
    pub async fn update(&self, id: Uuid, data: &UpdateTaxi) -> AppResult<Taxi> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(ref code) = data.taxi_code {
            let current = self.repository.taxis.get_by_id(id).await?;
            if normalize_taxi_code(code)? != current.taxi_code {
                return Err(AppError::Validation(
                    "Taxi code cannot be changed after creation".to_string(),
                ));
            }
        }

        let taxi = self.repository.taxis.update(id, data).await?;
        if let Some(active) = data.is_active {
            tracing::info!(taxi_code = %taxi.taxi_code, active, "Taxi activation changed");
        }
        Ok(taxi)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.taxis.delete(id).await?;
        tracing::info!(taxi_id = %id, "Taxi deleted");
        Ok(())
    }

    /// Most recent scans of a taxi
    pub async fn recent_scans(&self, id: Uuid) -> AppResult<Vec<Scan>> {
        let taxi = self.repository.taxis.get_by_id(id).await?;
        self.repository
            .scans
            .list_for_taxi(taxi.id, RECENT_SCANS_LIMIT)
            .await
    }
}
