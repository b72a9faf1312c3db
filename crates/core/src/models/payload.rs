//! Ingestion adapters for calendar records arriving as JSON.
//!
//! Clients send the same reference in several shapes: a bare id, an object
//! with `id` or `_id`, and for slots a wrapper object nesting the slot under
//! `slot`. Everything is normalized here so the engine only ever sees ids.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::calendar::CalendarEntry;

/// A reference to a record by id, in any accepted shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordRef {
    Id(Uuid),
    Object {
        #[serde(alias = "_id")]
        id: Uuid,
    },
}

impl RecordRef {
    pub fn id(&self) -> Uuid {
        match self {
            RecordRef::Id(id) | RecordRef::Object { id } => *id,
        }
    }
}

impl From<Uuid> for RecordRef {
    fn from(id: Uuid) -> Self {
        RecordRef::Id(id)
    }
}

impl Serialize for RecordRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id().serialize(serializer)
    }
}

/// Slot references additionally come wrapped as `{ "slot": { "_id": .. } }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SlotRef {
    Direct(RecordRef),
    Nested { slot: RecordRef },
}

impl SlotRef {
    pub fn id(&self) -> Uuid {
        match self {
            SlotRef::Direct(record) | SlotRef::Nested { slot: record } => record.id(),
        }
    }
}

impl From<Uuid> for SlotRef {
    fn from(id: Uuid) -> Self {
        SlotRef::Direct(RecordRef::Id(id))
    }
}

impl Serialize for SlotRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id().serialize(serializer)
    }
}

/// A calendar entry as posted by a client, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPayload {
    pub date: NaiveDate,
    #[serde(default, alias = "slot_id", alias = "time_slot")]
    pub slot: Option<SlotRef>,
    #[serde(default, alias = "activity_id")]
    pub activity: Option<RecordRef>,
    #[serde(default, alias = "teacher_id")]
    pub teacher: Option<RecordRef>,
}

impl EntryPayload {
    pub fn slot_id(&self) -> Option<Uuid> {
        self.slot.as_ref().map(SlotRef::id)
    }

    pub fn activity_id(&self) -> Option<Uuid> {
        self.activity.as_ref().map(RecordRef::id)
    }

    pub fn teacher_id(&self) -> Option<Uuid> {
        self.teacher.as_ref().map(RecordRef::id)
    }

    pub fn into_calendar_entry(self, class_id: Uuid) -> ScheduleResult<CalendarEntry> {
        let slot_id = self.slot_id().ok_or(ScheduleError::MissingField("slot_id"))?;
        Ok(CalendarEntry {
            class_id,
            date: self.date,
            slot_id,
            activity_id: self.activity_id(),
            teacher_id: self.teacher_id(),
        })
    }
}

pub fn entries_from_payloads(
    class_id: Uuid,
    payloads: Vec<EntryPayload>,
) -> ScheduleResult<Vec<CalendarEntry>> {
    payloads
        .into_iter()
        .map(|payload| payload.into_calendar_entry(class_id))
        .collect()
}
