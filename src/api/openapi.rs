//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, customers, health, liff, scan, stats, taxis};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taxi QR API",
        version = "1.0.0",
        description = "QR scan attribution for LINE mini-app campaigns"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // QR redirect (served at the root, outside /api/v1)
        scan::scan_redirect,
        // Mini-app
        liff::register,
        // Admin session
        auth::login,
        auth::check,
        auth::logout,
        // Taxis
        taxis::list_taxis,
        taxis::create_taxi,
        taxis::get_taxi,
        taxis::update_taxi,
        taxis::delete_taxi,
        taxis::list_taxi_scans,
        // Customers
        customers::list_customers,
        customers::update_customer,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Mini-app
            crate::models::customer::RegisterVisitor,
            crate::models::customer::RegisterResponse,
            // Admin session
            crate::models::session::LoginRequest,
            crate::models::session::SessionStatus,
            crate::models::session::SuccessResponse,
            // Taxis
            crate::models::taxi::Taxi,
            crate::models::taxi::CreateTaxi,
            crate::models::taxi::UpdateTaxi,
            crate::models::taxi::TaxiQuery,
            crate::models::taxi::TaxiResponse,
            crate::models::taxi::TaxiListResponse,
            crate::models::scan::Scan,
            // Customers
            crate::models::customer::Customer,
            crate::models::customer::CustomerWithTaxi,
            crate::models::customer::FirstTaxi,
            crate::models::customer::CustomerQuery,
            crate::models::customer::UpdateCustomer,
            crate::models::customer::CustomerResponse,
            crate::models::customer::CustomerListResponse,
            // Stats
            crate::models::stats::StatsResponse,
            crate::models::stats::StatsSummary,
            crate::models::stats::TopTaxi,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scan", description = "QR code redirect"),
        (name = "liff", description = "LINE mini-app registration"),
        (name = "auth", description = "Admin session"),
        (name = "taxis", description = "Taxi management"),
        (name = "customers", description = "Customer listing and purchase tagging"),
        (name = "stats", description = "Campaign statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
