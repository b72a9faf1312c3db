//! Postgres implementation of the scheduling store traits.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveTime};
use eyre::{Result, eyre};
use kinder_core::{
    catalog::SlotCatalog,
    conflict::ConflictKind,
    errors::{ScheduleError, ScheduleResult},
    models::{
        activity::{Activity, CreateActivityRequest},
        calendar::{BulkDirective, BulkWriteReport, CalendarEntry, EntryAssignment},
        class::{ClassSummary, Teacher},
        time_slot::{CreateTimeSlotRequest, TimeSlot},
    },
    store::{CalendarStore, CatalogAdmin, ScheduleDirectory, StoreError},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::DbPool;
use crate::repositories::{activity, calendar, class, teacher, time_slot};

/// The teacher a write is charged to: the requested one, else the class's
/// homeroom teacher.
pub fn effective_teacher(
    requested: Option<Uuid>,
    homeroom: Option<Uuid>,
) -> std::result::Result<Uuid, ConflictKind> {
    requested
        .or(homeroom)
        .ok_or(ConflictKind::MissingHomeroomTeacher)
}

pub(crate) fn unknown_class(class_id: Uuid) -> ConflictKind {
    ConflictKind::Other(format!("class {} does not exist", class_id))
}

/// Maps constraint violations raised by Postgres onto conflicts.
fn constraint_conflict(report: &eyre::Report) -> Option<ConflictKind> {
    let sqlx::Error::Database(db) = report.downcast_ref::<sqlx::Error>()? else {
        return None;
    };
    match db.code().as_deref() {
        Some("23505") => Some(ConflictKind::DuplicateEntry),
        Some("23503") if db.constraint().is_some_and(|name| name.contains("slot_id")) => {
            Some(ConflictKind::SlotNoLongerExists)
        }
        Some("23503") => Some(ConflictKind::classify(db.message())),
        _ => None,
    }
}

#[derive(Clone)]
pub struct PgBackend {
    pool: DbPool,
}

impl PgBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Checks for a double booking and writes in one transaction, holding
    /// the teacher's lock for `date` throughout.
    async fn write_assignment(
        &self,
        class: &ClassSummary,
        slot: &TimeSlot,
        date: NaiveDate,
        activity_id: Uuid,
        teacher_id: Option<Uuid>,
    ) -> std::result::Result<CalendarEntry, StoreError> {
        let teacher_id =
            effective_teacher(teacher_id, class.homeroom_teacher_id).map_err(StoreError::Conflict)?;

        let mut tx = self.pool.begin().await.map_err(eyre::Report::from)?;
        calendar::lock_teacher_day(&mut *tx, teacher_id, date).await?;

        if calendar::teacher_has_overlap(
            &mut *tx,
            teacher_id,
            date,
            class.id,
            slot.start_time,
            slot.end_time,
        )
        .await?
        {
            return Err(StoreError::Conflict(ConflictKind::TeacherDoubleBooked));
        }

        let written =
            calendar::upsert_entry(&mut *tx, class.id, date, slot.id, activity_id, teacher_id).await;
        let row = match written {
            Ok(row) => row,
            Err(report) => {
                return Err(match constraint_conflict(&report) {
                    Some(kind) => StoreError::Conflict(kind),
                    None => StoreError::Transport(report),
                });
            }
        };
        tx.commit().await.map_err(eyre::Report::from)?;

        Ok(row.into())
    }

    async fn class_for_write(&self, class_id: Uuid) -> std::result::Result<ClassSummary, StoreError> {
        class::get_class_by_id(&self.pool, class_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| StoreError::Conflict(unknown_class(class_id)))
    }

    /// Creates, or updates when `replacing` is set, a slot under the catalog
    /// lock so the overlap check and the write see the same slots.
    async fn write_time_slot(
        &self,
        start_time: NaiveTime,
        end_time: NaiveTime,
        replacing: Option<Uuid>,
        name: &str,
    ) -> ScheduleResult<TimeSlot> {
        let mut tx = self.pool.begin().await.map_err(eyre::Report::from)?;
        time_slot::lock_time_slots(&mut *tx).await?;

        let current = time_slot::get_time_slots(&mut *tx).await?;
        SlotCatalog::new(current.into_iter().map(Into::into).collect())
            .ensure_fits(start_time, end_time, replacing)?;

        let row = match replacing {
            Some(id) => time_slot::update_time_slot(&mut *tx, id, name, start_time, end_time)
                .await?
                .ok_or_else(|| ScheduleError::NotFound(format!("Time slot with ID {} not found", id)))?,
            None => time_slot::create_time_slot(&mut *tx, name, start_time, end_time).await?,
        };
        tx.commit().await.map_err(eyre::Report::from)?;

        Ok(row.into())
    }
}

#[async_trait]
impl ScheduleDirectory for PgBackend {
    async fn time_slots(&self) -> Result<Vec<TimeSlot>> {
        let rows = time_slot::get_time_slots(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn activities(&self) -> Result<Vec<Activity>> {
        let rows = activity::get_activities(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn teachers(&self) -> Result<Vec<Teacher>> {
        let rows = teacher::get_teachers(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_class(&self, class_id: Uuid) -> Result<Option<ClassSummary>> {
        Ok(class::get_class_by_id(&self.pool, class_id)
            .await?
            .map(Into::into))
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
        let week_end = week_start
            .checked_add_days(Days::new(6))
            .unwrap_or(NaiveDate::MAX);
        let rows = calendar::get_entries_in_range(&self.pool, class_id, week_start, week_end).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CalendarStore for PgBackend {
    async fn bulk_upsert(&self, directives: &[BulkDirective]) -> Result<BulkWriteReport> {
        debug!("Applying {} calendar directive(s)", directives.len());
        let mut report = BulkWriteReport::default();

        // One catalog read per batch; a slot deleted after this point still
        // fails its write through the foreign key.
        let slots: HashMap<Uuid, TimeSlot> = time_slot::get_time_slots(&self.pool)
            .await?
            .into_iter()
            .map(|row| (row.id, row.into()))
            .collect();
        let mut classes: HashMap<Uuid, Option<ClassSummary>> = HashMap::new();

        for (index, directive) in directives.iter().enumerate() {
            let result = match (directive.delete, directive.activity_id) {
                (false, Some(activity_id)) => {
                    if !classes.contains_key(&directive.class_id) {
                        let class = class::get_class_by_id(&self.pool, directive.class_id)
                            .await?
                            .map(Into::into);
                        classes.insert(directive.class_id, class);
                    }
                    let class = classes.get(&directive.class_id).and_then(Option::as_ref);
                    match (class, slots.get(&directive.slot_id)) {
                        (None, _) => Err(StoreError::Conflict(unknown_class(directive.class_id))),
                        (Some(_), None) => Err(StoreError::Conflict(ConflictKind::SlotNoLongerExists)),
                        (Some(class), Some(slot)) => self
                            .write_assignment(
                                class,
                                slot,
                                directive.date,
                                activity_id,
                                directive.teacher_id,
                            )
                            .await
                            .map(|_| ()),
                    }
                }
                _ => calendar::delete_entry(
                    &self.pool,
                    directive.class_id,
                    directive.date,
                    directive.slot_id,
                )
                .await
                .map(|_| ())
                .map_err(StoreError::from),
            };

            match result {
                Ok(()) => report.record_success(),
                Err(StoreError::Conflict(kind)) => {
                    debug!(
                        "Directive {} rejected for {} slot {}: {}",
                        index, directive.date, directive.slot_id, kind
                    );
                    report.record_error(index, kind.reason());
                }
                Err(StoreError::Transport(err)) => {
                    warn!("Bulk calendar write aborted at directive {}: {}", index, err);
                    return Err(err);
                }
            }
        }

        Ok(report)
    }

    async fn upsert_entry(
        &self,
        assignment: &EntryAssignment,
    ) -> std::result::Result<CalendarEntry, StoreError> {
        let class = self.class_for_write(assignment.class_id).await?;
        let slot: TimeSlot = time_slot::get_time_slot_by_id(&self.pool, assignment.slot_id)
            .await?
            .ok_or(StoreError::Conflict(ConflictKind::SlotNoLongerExists))?
            .into();

        self.write_assignment(
            &class,
            &slot,
            assignment.date,
            assignment.activity_id,
            assignment.teacher_id,
        )
        .await
    }
}

#[async_trait]
impl CatalogAdmin for PgBackend {
    async fn create_time_slot(&self, request: &CreateTimeSlotRequest) -> ScheduleResult<TimeSlot> {
        self.write_time_slot(request.start_time, request.end_time, None, &request.name)
            .await
    }

    async fn update_time_slot(&self, slot: &TimeSlot) -> ScheduleResult<TimeSlot> {
        self.write_time_slot(slot.start_time, slot.end_time, Some(slot.id), &slot.name)
            .await
    }

    async fn delete_time_slot(&self, id: Uuid) -> Result<bool> {
        time_slot::delete_time_slot(&self.pool, id).await
    }

    async fn create_activity(&self, request: &CreateActivityRequest) -> Result<Activity> {
        let row = activity::create_activity(
            &self.pool,
            &request.name,
            &request.description,
            request.requires_outdoor,
        )
        .await?;
        Ok(row.into())
    }

    async fn update_activity(&self, updated: &Activity) -> Result<Activity> {
        let row = activity::update_activity(
            &self.pool,
            updated.id,
            &updated.name,
            &updated.description,
            updated.requires_outdoor,
        )
        .await?
        .ok_or_else(|| eyre!("Activity {} disappeared during update", updated.id))?;
        Ok(row.into())
    }

    async fn delete_activity(&self, id: Uuid) -> Result<bool> {
        activity::delete_activity(&self.pool, id).await
    }
}
