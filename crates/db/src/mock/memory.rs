//! A process-local backend with the same conflict rules as [`PgBackend`].
//!
//! [`PgBackend`]: crate::PgBackend

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use eyre::{Result, eyre};
use kinder_core::{
    catalog::SlotCatalog,
    conflict::ConflictKind,
    errors::ScheduleResult,
    models::{
        activity::{Activity, CreateActivityRequest},
        calendar::{BulkDirective, BulkWriteReport, CalendarEntry, EntryAssignment, EntryKey},
        class::{ClassSummary, Teacher},
        time_slot::{CreateTimeSlotRequest, TimeSlot},
    },
    store::{CalendarStore, CatalogAdmin, ScheduleDirectory, StoreError},
};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::backend::{effective_teacher, unknown_class};

#[derive(Debug, Default)]
struct MemoryState {
    slots: Vec<TimeSlot>,
    activities: Vec<Activity>,
    teachers: Vec<Teacher>,
    classes: HashMap<Uuid, ClassSummary>,
    entries: BTreeMap<EntryKey, CalendarEntry>,
}

impl MemoryState {
    fn slot(&self, id: Uuid) -> Option<&TimeSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    fn write(
        &mut self,
        class_id: Uuid,
        date: NaiveDate,
        slot_id: Uuid,
        activity_id: Uuid,
        teacher_id: Option<Uuid>,
    ) -> std::result::Result<CalendarEntry, ConflictKind> {
        let class = self
            .classes
            .get(&class_id)
            .ok_or_else(|| unknown_class(class_id))?;
        let slot = self.slot(slot_id).ok_or(ConflictKind::SlotNoLongerExists)?;
        if !self.activities.iter().any(|activity| activity.id == activity_id) {
            return Err(ConflictKind::Other(format!(
                "activity {} does not exist",
                activity_id
            )));
        }
        let teacher_id = effective_teacher(teacher_id, class.homeroom_teacher_id)?;

        let double_booked = self.entries.values().any(|existing| {
            existing.date == date
                && existing.class_id != class_id
                && existing.teacher_id == Some(teacher_id)
                && existing.is_scheduled()
                && self
                    .slot(existing.slot_id)
                    .is_some_and(|other| other.overlaps(slot.start_time, slot.end_time))
        });
        if double_booked {
            return Err(ConflictKind::TeacherDoubleBooked);
        }

        let entry = CalendarEntry {
            class_id,
            date,
            slot_id,
            activity_id: Some(activity_id),
            teacher_id: Some(teacher_id),
        };
        self.entries.insert(entry.key(), entry.clone());
        Ok(entry)
    }
}

/// Seed it with the builder methods, then hand it out as any of the store
/// traits.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    offline: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_slot(mut self, slot: TimeSlot) -> Self {
        self.state.get_mut().slots.push(slot);
        self
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.state.get_mut().activities.push(activity);
        self
    }

    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.state.get_mut().teachers.push(teacher);
        self
    }

    pub fn with_class(mut self, class: ClassSummary) -> Self {
        self.state.get_mut().classes.insert(class.id, class);
        self
    }

    pub fn with_entry(mut self, entry: CalendarEntry) -> Self {
        self.state.get_mut().entries.insert(entry.key(), entry);
        self
    }

    pub async fn insert_class(&self, class: ClassSummary) {
        self.state.write().await.classes.insert(class.id, class);
    }

    /// Stores `entry` as is, bypassing the conflict rules.
    pub async fn insert_entry(&self, entry: CalendarEntry) {
        self.state.write().await.entries.insert(entry.key(), entry);
    }

    /// While offline every call fails the way a dropped connection would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// All stored entries of a class, ordered by date then slot id.
    pub async fn entries_for(&self, class_id: Uuid) -> Vec<CalendarEntry> {
        self.state
            .read()
            .await
            .entries
            .values()
            .filter(|entry| entry.class_id == class_id)
            .cloned()
            .collect()
    }

    pub async fn entry(&self, key: EntryKey) -> Option<CalendarEntry> {
        self.state.read().await.entries.get(&key).cloned()
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(eyre!("calendar store is offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleDirectory for MemoryBackend {
    async fn time_slots(&self) -> Result<Vec<TimeSlot>> {
        self.ensure_online()?;
        Ok(self.state.read().await.slots.clone())
    }

    async fn activities(&self) -> Result<Vec<Activity>> {
        self.ensure_online()?;
        Ok(self.state.read().await.activities.clone())
    }

    async fn teachers(&self) -> Result<Vec<Teacher>> {
        self.ensure_online()?;
        Ok(self.state.read().await.teachers.clone())
    }

    async fn find_class(&self, class_id: Uuid) -> Result<Option<ClassSummary>> {
        self.ensure_online()?;
        Ok(self.state.read().await.classes.get(&class_id).cloned())
    }

    async fn class_end_date(&self, class_id: Uuid) -> Result<Option<NaiveDate>> {
        Ok(self
            .find_class(class_id)
            .await?
            .and_then(|class| class.end_date))
    }

    async fn template_week_entries(
        &self,
        class_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Vec<CalendarEntry>> {
        self.ensure_online()?;
        let week_end = week_start
            .checked_add_days(Days::new(6))
            .unwrap_or(NaiveDate::MAX);
        Ok(self
            .state
            .read()
            .await
            .entries
            .values()
            .filter(|entry| {
                entry.class_id == class_id
                    && entry.date >= week_start
                    && entry.date <= week_end
                    && entry.is_scheduled()
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CalendarStore for MemoryBackend {
    async fn bulk_upsert(&self, directives: &[BulkDirective]) -> Result<BulkWriteReport> {
        self.ensure_online()?;
        let mut state = self.state.write().await;
        let mut report = BulkWriteReport::default();

        for (index, directive) in directives.iter().enumerate() {
            let result = match (directive.delete, directive.activity_id) {
                (false, Some(activity_id)) => state
                    .write(
                        directive.class_id,
                        directive.date,
                        directive.slot_id,
                        activity_id,
                        directive.teacher_id,
                    )
                    .map(|_| ()),
                _ => {
                    state.entries.remove(&directive.key());
                    Ok(())
                }
            };
            match result {
                Ok(()) => report.record_success(),
                Err(kind) => {
                    debug!("Directive {} rejected: {}", index, kind);
                    report.record_error(index, kind.reason());
                }
            }
        }

        Ok(report)
    }

    async fn upsert_entry(
        &self,
        assignment: &EntryAssignment,
    ) -> std::result::Result<CalendarEntry, StoreError> {
        self.ensure_online()?;
        self.state
            .write()
            .await
            .write(
                assignment.class_id,
                assignment.date,
                assignment.slot_id,
                assignment.activity_id,
                assignment.teacher_id,
            )
            .map_err(StoreError::Conflict)
    }
}

#[async_trait]
impl CatalogAdmin for MemoryBackend {
    async fn create_time_slot(&self, request: &CreateTimeSlotRequest) -> ScheduleResult<TimeSlot> {
        self.ensure_online()?;
        let mut state = self.state.write().await;
        SlotCatalog::new(state.slots.clone()).ensure_fits(request.start_time, request.end_time, None)?;
        let slot = TimeSlot {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            start_time: request.start_time,
            end_time: request.end_time,
        };
        state.slots.push(slot.clone());
        Ok(slot)
    }

    async fn update_time_slot(&self, slot: &TimeSlot) -> ScheduleResult<TimeSlot> {
        self.ensure_online()?;
        let mut state = self.state.write().await;
        SlotCatalog::new(state.slots.clone()).ensure_fits(slot.start_time, slot.end_time, Some(slot.id))?;
        let existing = state
            .slots
            .iter_mut()
            .find(|existing| existing.id == slot.id)
            .ok_or_else(|| eyre!("Time slot {} disappeared during update", slot.id))?;
        *existing = slot.clone();
        Ok(slot.clone())
    }

    async fn delete_time_slot(&self, id: Uuid) -> Result<bool> {
        self.ensure_online()?;
        let mut state = self.state.write().await;
        let before = state.slots.len();
        state.slots.retain(|slot| slot.id != id);
        // Same cascade as the foreign key in Postgres.
        state.entries.retain(|key, _| key.slot_id != id);
        Ok(state.slots.len() < before)
    }

    async fn create_activity(&self, request: &CreateActivityRequest) -> Result<Activity> {
        self.ensure_online()?;
        let activity = Activity {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            description: request.description.clone(),
            requires_outdoor: request.requires_outdoor,
        };
        self.state.write().await.activities.push(activity.clone());
        Ok(activity)
    }

    async fn update_activity(&self, activity: &Activity) -> Result<Activity> {
        self.ensure_online()?;
        let mut state = self.state.write().await;
        let existing = state
            .activities
            .iter_mut()
            .find(|existing| existing.id == activity.id)
            .ok_or_else(|| eyre!("Activity {} disappeared during update", activity.id))?;
        *existing = activity.clone();
        Ok(activity.clone())
    }

    async fn delete_activity(&self, id: Uuid) -> Result<bool> {
        self.ensure_online()?;
        let mut state = self.state.write().await;
        let before = state.activities.len();
        state.activities.retain(|activity| activity.id != id);
        // An entry without an activity is no entry at all.
        state.entries.retain(|_, entry| entry.activity_id != Some(id));
        Ok(state.activities.len() < before)
    }
}
