use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use kinder_core::{
    catalog::{self, SlotCatalog},
    models::{
        activity::{Activity, CreateActivityRequest, UpdateActivityRequest},
        class::Teacher,
        time_slot::{CreateTimeSlotRequest, TimeSlot, UpdateTimeSlotRequest},
    },
    store::ScheduleDirectory,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Slots in day order.
#[axum::debug_handler]
pub async fn list_time_slots(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let catalog = SlotCatalog::new(state.backend.time_slots().await?);
    Ok(Json(catalog.slots().to_vec()))
}

#[axum::debug_handler]
pub async fn create_time_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateTimeSlotRequest>,
) -> Result<(StatusCode, Json<TimeSlot>), AppError> {
    let slot = catalog::create_time_slot(state.backend.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

#[axum::debug_handler]
pub async fn update_time_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTimeSlotRequest>,
) -> Result<Json<TimeSlot>, AppError> {
    let slot = catalog::update_time_slot(state.backend.as_ref(), id, &payload).await?;
    Ok(Json(slot))
}

#[axum::debug_handler]
pub async fn delete_time_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    catalog::delete_time_slot(state.backend.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_activities(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Activity>>, AppError> {
    Ok(Json(state.backend.activities().await?))
}

#[axum::debug_handler]
pub async fn create_activity(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let activity = catalog::create_activity(state.backend.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

#[axum::debug_handler]
pub async fn update_activity(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateActivityRequest>,
) -> Result<Json<Activity>, AppError> {
    let activity = catalog::update_activity(state.backend.as_ref(), id, &payload).await?;
    Ok(Json(activity))
}

#[axum::debug_handler]
pub async fn delete_activity(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    catalog::delete_activity(state.backend.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_teachers(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Teacher>>, AppError> {
    Ok(Json(state.backend.teachers().await?))
}
