use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/time-slots",
            get(handlers::catalog::list_time_slots).post(handlers::catalog::create_time_slot),
        )
        .route(
            "/api/time-slots/:id",
            put(handlers::catalog::update_time_slot).delete(handlers::catalog::delete_time_slot),
        )
}
