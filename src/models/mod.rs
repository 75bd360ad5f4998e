//! Data models for the Taxi QR server

pub mod customer;
pub mod scan;
pub mod session;
pub mod stats;
pub mod taxi;

// Re-export commonly used types
pub use customer::{Customer, CustomerWithTaxi, RegisterResponse, RegisterVisitor, VisitorProfile};
pub use scan::{NewScan, Scan, ScanAttribution};
pub use session::AdminClaims;
pub use stats::StatsResponse;
pub use taxi::{normalize_taxi_code, Taxi};
