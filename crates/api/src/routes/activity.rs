use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/activities",
            get(handlers::catalog::list_activities).post(handlers::catalog::create_activity),
        )
        .route(
            "/api/activities/:id",
            put(handlers::catalog::update_activity).delete(handlers::catalog::delete_activity),
        )
}
