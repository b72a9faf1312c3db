use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use kinder_core::{
    catalog::SlotCatalog,
    editor,
    errors::ScheduleError,
    models::{calendar::CalendarEntry, payload::EntryPayload, time_slot::TimeSlot},
    reconcile::{
        PropagationOutcome, PropagationPreview, PropagationRequest, preview_propagation,
        propagate_template_week,
    },
    store::ScheduleDirectory,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub week_start: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeekResponse {
    pub class_id: Uuid,
    pub week_start: NaiveDate,
    pub slots: Vec<TimeSlot>,
    pub entries: Vec<CalendarEntry>,
}

/// A propagation outcome plus what the caller should do with it.
#[derive(Debug, Serialize)]
pub struct PropagationResponse {
    #[serde(flatten)]
    pub outcome: PropagationOutcome,
    /// Set when part of the range was written and open views are stale.
    pub refresh: bool,
    pub message: String,
}

impl From<PropagationOutcome> for PropagationResponse {
    fn from(outcome: PropagationOutcome) -> Self {
        Self {
            refresh: outcome.needs_refresh(),
            message: outcome.message(),
            outcome,
        }
    }
}

#[axum::debug_handler]
pub async fn get_week(
    State(state): State<Arc<ApiState>>,
    Path(class_id): Path<Uuid>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekResponse>, AppError> {
    let backend = state.backend.as_ref();
    if backend.find_class(class_id).await?.is_none() {
        return Err(ScheduleError::UnknownClass(class_id).into());
    }

    let slots = SlotCatalog::new(backend.time_slots().await?);
    let entries = backend
        .template_week_entries(class_id, query.week_start)
        .await?;

    Ok(Json(WeekResponse {
        class_id,
        week_start: query.week_start,
        slots: slots.slots().to_vec(),
        entries,
    }))
}

#[axum::debug_handler]
pub async fn edit_entry(
    State(state): State<Arc<ApiState>>,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<EntryPayload>,
) -> Result<Json<CalendarEntry>, AppError> {
    let entry = editor::edit_entry(state.backend.as_ref(), class_id, &payload, state.today()).await?;
    Ok(Json(entry))
}

#[axum::debug_handler]
pub async fn propagate(
    State(state): State<Arc<ApiState>>,
    Path(class_id): Path<Uuid>,
    Json(request): Json<PropagationRequest>,
) -> Result<Json<PropagationResponse>, AppError> {
    let outcome =
        propagate_template_week(state.backend.as_ref(), class_id, &request, state.today()).await?;
    if outcome.needs_refresh() {
        info!("Propagation for class {} was partial; clients should reload", class_id);
    }
    Ok(Json(outcome.into()))
}

#[axum::debug_handler]
pub async fn preview(
    State(state): State<Arc<ApiState>>,
    Path(class_id): Path<Uuid>,
    Json(request): Json<PropagationRequest>,
) -> Result<Json<PropagationPreview>, AppError> {
    let preview =
        preview_propagation(state.backend.as_ref(), class_id, &request, state.today()).await?;
    Ok(Json(preview))
}
