//! One-off edits of a single calendar entry, outside the bulk flow.

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::ActivityCatalog;
use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::{
    calendar::{CalendarEntry, EntryAssignment},
    payload::EntryPayload,
};
use crate::store::{CalendarStore, ScheduleDirectory};

/// Request-only checks, in order: required fields, then the date.
pub fn validate_assignment(
    class_id: Uuid,
    payload: &EntryPayload,
    today: NaiveDate,
) -> ScheduleResult<EntryAssignment> {
    let slot_id = payload.slot_id().ok_or(ScheduleError::MissingField("slot_id"))?;
    let activity_id = payload
        .activity_id()
        .ok_or(ScheduleError::MissingField("activity_id"))?;

    if payload.date < today {
        return Err(ScheduleError::PastDate {
            date: payload.date,
            today,
        });
    }

    Ok(EntryAssignment {
        class_id,
        date: payload.date,
        slot_id,
        activity_id,
        teacher_id: payload.teacher_id(),
    })
}

/// Validates and writes one (date, slot, activity, teacher) assignment.
///
/// Store conflicts come back as [`ScheduleError::Conflict`] with the
/// store's reason intact.
pub async fn edit_entry<B>(
    backend: &B,
    class_id: Uuid,
    payload: &EntryPayload,
    today: NaiveDate,
) -> ScheduleResult<CalendarEntry>
where
    B: ScheduleDirectory + CalendarStore + ?Sized,
{
    let assignment = validate_assignment(class_id, payload, today)?;

    if backend.find_class(class_id).await?.is_none() {
        return Err(ScheduleError::UnknownClass(class_id));
    }

    let activities = ActivityCatalog::new(backend.activities().await?);
    if !activities.contains(assignment.activity_id) {
        return Err(ScheduleError::NotFound(format!(
            "Activity with ID {} not found",
            assignment.activity_id
        )));
    }

    match backend.upsert_entry(&assignment).await {
        Ok(entry) => {
            info!(
                "Saved calendar entry: class={}, date={}, slot={}",
                entry.class_id, entry.date, entry.slot_id
            );
            Ok(entry)
        }
        Err(err) => {
            warn!(
                "Calendar entry rejected: class={}, date={}, slot={}: {}",
                class_id, assignment.date, assignment.slot_id, err
            );
            Err(err.into())
        }
    }
}
