//! Taxi QR attribution server
//!
//! Records QR code scans on taxis, reconciles riders who log in through the
//! LINE mini-app against the taxi they scanned, and exposes a small admin
//! REST JSON API for taxis, customers and campaign statistics.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
