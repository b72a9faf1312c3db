use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/classes/:class_id/calendar",
            get(handlers::calendar::get_week),
        )
        .route(
            "/api/classes/:class_id/calendar/entries",
            put(handlers::calendar::edit_entry),
        )
        .route(
            "/api/classes/:class_id/calendar/propagate",
            post(handlers::calendar::propagate),
        )
        .route(
            "/api/classes/:class_id/calendar/propagate/preview",
            post(handlers::calendar::preview),
        )
}
