//! Taxi QR Server - scan attribution for LINE mini-app campaigns

use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taxi_qr_server::{
    api,
    config::{AppConfig, RateLimitConfig},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config);

    tracing::info!("Starting Taxi QR Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let repository = Repository::new(pool);
    let services = Services::new(repository, &config).context("Failed to create services")?;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );
    let rate_limit = config.rate_limit.clone();

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state, &rate_limit)?;

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("taxi_qr_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the application router with all routes
fn create_router(state: AppState, rate_limit: &RateLimitConfig) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Unauthenticated routes reachable by riders and the login form
    let mut public = Router::new()
        .route("/t/:taxi_code", get(api::scan::scan_redirect))
        .route("/api/v1/liff/register", post(api::liff::register))
        .route(
            "/api/v1/auth",
            post(api::auth::login)
                .get(api::auth::check)
                .delete(api::auth::logout),
        )
        .with_state(state.clone());

    if rate_limit.enabled {
        let governor = GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(rate_limit.replenish_secs)
            .burst_size(rate_limit.burst_size)
            .finish()
            .context("Invalid rate limit configuration")?;
        public = public.layer(GovernorLayer {
            config: Arc::new(governor),
        });
    }

    // Admin routes (session cookie required)
    let api_v1 = Router::new()
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Taxis
        .route(
            "/taxis",
            get(api::taxis::list_taxis).post(api::taxis::create_taxi),
        )
        .route(
            "/taxis/:id",
            get(api::taxis::get_taxi)
                .put(api::taxis::update_taxi)
                .delete(api::taxis::delete_taxi),
        )
        .route("/taxis/:id/scans", get(api::taxis::list_taxi_scans))
        // Customers
        .route("/customers", get(api::customers::list_customers))
        .route("/customers/:line_user_id", put(api::customers::update_customer))
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Ok(Router::new()
        .merge(public)
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}
