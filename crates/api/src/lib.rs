//! # Kinder API
//!
//! The web server for the kindergarten weekly calendar. It exposes the slot
//! and activity catalogs, the per-class week view, single-entry edits and
//! template-week propagation.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into calls on the scheduling engine
//! - **Middleware**: Map engine errors onto HTTP responses
//! - **Config**: Handle environment and application configuration
//!
//! Handlers never talk to Postgres directly; they go through a
//! [`SchedulingBackend`] so the same router runs against the in-memory
//! backend in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers that drive the scheduling engine
pub mod handlers;
/// Error mapping middleware
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::HeaderValue};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use eyre::Result;
use kinder_core::store::SchedulingBackend;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Where slots, activities and calendar entries live
    pub backend: Arc<dyn SchedulingBackend>,
    /// The school's timezone; "today" is the current date there
    pub timezone: Tz,
}

impl ApiState {
    pub fn new(backend: Arc<dyn SchedulingBackend>, timezone: Tz) -> Self {
        Self { backend, timezone }
    }

    /// The current calendar date at the school.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// Builds the application router with every route attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot and activity catalogs
        .merge(routes::time_slot::routes())
        .merge(routes::activity::routes())
        .merge(routes::teacher::routes())
        // Week view, single edits and propagation
        .merge(routes::calendar::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and backend
///
/// This function initializes logging, configures routes and middleware, and
/// serves HTTP until the listener fails.
///
/// # Arguments
///
/// * `config` - API configuration including host, port, and other settings
/// * `backend` - Storage for catalogs and calendar entries
pub async fn start_server(
    config: config::ApiConfig,
    backend: Arc<dyn SchedulingBackend>,
) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(backend, config.timezone));
    info!(
        "Using school timezone {} (today is {})",
        config.timezone,
        state.today()
    );
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(allowed)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request tracing and timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
