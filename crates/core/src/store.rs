//! Seams between the scheduling engine and whatever persists the calendar.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::conflict::ConflictKind;
use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::{
    activity::{Activity, CreateActivityRequest},
    calendar::{BulkDirective, BulkWriteReport, CalendarEntry, EntryAssignment},
    class::{ClassSummary, Teacher},
    time_slot::{CreateTimeSlotRequest, TimeSlot},
};

/// Why a single-entry write failed.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(ConflictKind),

    #[error("calendar store request failed: {0}")]
    Transport(#[from] eyre::Report),
}

impl From<StoreError> for ScheduleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(kind) => ScheduleError::Conflict(kind),
            StoreError::Transport(report) => ScheduleError::Transport(report),
        }
    }
}

/// Reference data the engine reads.
#[async_trait]
pub trait ScheduleDirectory: Send + Sync {
    async fn time_slots(&self) -> eyre::Result<Vec<TimeSlot>>;

    async fn activities(&self) -> eyre::Result<Vec<Activity>>;

    async fn teachers(&self) -> eyre::Result<Vec<Teacher>>;

    async fn find_class(&self, class_id: Uuid) -> eyre::Result<Option<ClassSummary>>;

    /// `None` when the class has no end date or does not exist.
    async fn class_end_date(&self, class_id: Uuid) -> eyre::Result<Option<NaiveDate>>;

    /// Stored entries of the seven days starting at `week_start`.
    async fn template_week_entries(
        &self,
        class_id: Uuid,
        week_start: NaiveDate,
    ) -> eyre::Result<Vec<CalendarEntry>>;
}

/// The write side of the calendar.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Applies every directive independently. Rejected directives are
    /// reported in the returned report; `Err` means the call itself failed.
    async fn bulk_upsert(&self, directives: &[BulkDirective]) -> eyre::Result<BulkWriteReport>;

    async fn upsert_entry(&self, assignment: &EntryAssignment) -> Result<CalendarEntry, StoreError>;
}

#[async_trait]
pub trait CatalogAdmin: Send + Sync {
    /// The store re-checks slot overlap in the same atomic step as the
    /// write and rejects a clash with [`ScheduleError::Validation`].
    async fn create_time_slot(&self, request: &CreateTimeSlotRequest) -> ScheduleResult<TimeSlot>;

    async fn update_time_slot(&self, slot: &TimeSlot) -> ScheduleResult<TimeSlot>;

    /// Returns whether a slot was removed.
    async fn delete_time_slot(&self, id: Uuid) -> eyre::Result<bool>;

    async fn create_activity(&self, request: &CreateActivityRequest) -> eyre::Result<Activity>;

    async fn update_activity(&self, activity: &Activity) -> eyre::Result<Activity>;

    async fn delete_activity(&self, id: Uuid) -> eyre::Result<bool>;
}

/// Everything a scheduling deployment has to provide.
pub trait SchedulingBackend: ScheduleDirectory + CalendarStore + CatalogAdmin {}

impl<T> SchedulingBackend for T where T: ScheduleDirectory + CalendarStore + CatalogAdmin + ?Sized {}
