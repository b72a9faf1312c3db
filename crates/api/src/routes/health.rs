use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use kinder_core::store::ScheduleDirectory;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::ApiState;

pub const SERVICE_NAME: &str = "kinder-scheduling";

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    calendar_store: &'static str,
    timezone: String,
}

#[derive(Serialize)]
struct VersionResponse {
    service: &'static str,
    version: &'static str,
}

/// Reports 503 while the calendar store cannot list the slot catalog.
async fn health_check(State(state): State<Arc<ApiState>>) -> (StatusCode, Json<HealthResponse>) {
    let timezone = state.timezone.name().to_string();
    match state.backend.time_slots().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                calendar_store: "reachable",
                timezone,
            }),
        ),
        Err(err) => {
            warn!("Health check could not reach the calendar store: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    calendar_store: "unreachable",
                    timezone,
                }),
            )
        }
    }
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
