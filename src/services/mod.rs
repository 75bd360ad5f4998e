//! Business logic services

pub mod attribution;
pub mod customers;
pub mod line;
pub mod session;
pub mod stats;
pub mod taxis;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub attribution: attribution::AttributionService,
    pub taxis: taxis::TaxisService,
    pub customers: customers::CustomersService,
    pub stats: stats::StatsService,
    pub session: session::SessionService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let verifier = line::LineAuthClient::from_config(&config.line)?;
        if verifier.is_none() {
            tracing::warn!("LINE ID token verification disabled: line.channel_id is not set");
        }

        Ok(Self {
            attribution: attribution::AttributionService::new(
                Arc::new(repository.clone()),
                config.liff.clone(),
                verifier,
            ),
            taxis: taxis::TaxisService::new(repository.clone()),
            customers: customers::CustomersService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            session: session::SessionService::new(&config.admin)?,
            repository,
        })
    }
}
