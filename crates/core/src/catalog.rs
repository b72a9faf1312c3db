//! Read-only snapshots of the slot and activity catalogs, plus the checks
//! catalog administration runs before a write.

use chrono::NaiveTime;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::{
    activity::{Activity, CreateActivityRequest, UpdateActivityRequest},
    time_slot::{CreateTimeSlotRequest, TimeSlot, UpdateTimeSlotRequest},
};
use crate::store::{CatalogAdmin, ScheduleDirectory};

#[derive(Debug, Clone, Default)]
pub struct SlotCatalog {
    slots: Vec<TimeSlot>,
}

impl SlotCatalog {
    /// Slots are kept ordered by start time.
    pub fn new(mut slots: Vec<TimeSlot>) -> Self {
        slots.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        Self { slots }
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.slots.iter().map(|slot| slot.id)
    }

    pub fn get(&self, id: Uuid) -> Option<&TimeSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Rejects a slot that would overlap an existing one. `replacing` names
    /// the slot being edited, which is excluded from the comparison.
    pub fn ensure_fits(
        &self,
        start_time: NaiveTime,
        end_time: NaiveTime,
        replacing: Option<Uuid>,
    ) -> ScheduleResult<()> {
        validate_slot_times(start_time, end_time)?;

        let clash = self
            .slots
            .iter()
            .filter(|slot| Some(slot.id) != replacing)
            .find(|slot| slot.overlaps(start_time, end_time));

        match clash {
            Some(slot) => Err(ScheduleError::Validation(format!(
                "time slot {}-{} overlaps existing slot '{}' ({}-{})",
                start_time.format("%H:%M"),
                end_time.format("%H:%M"),
                slot.name,
                slot.start_time.format("%H:%M"),
                slot.end_time.format("%H:%M"),
            ))),
            None => Ok(()),
        }
    }
}

pub fn validate_slot_times(start_time: NaiveTime, end_time: NaiveTime) -> ScheduleResult<()> {
    if start_time >= end_time {
        return Err(ScheduleError::Validation(format!(
            "time slot start {} must be before end {}",
            start_time.format("%H:%M"),
            end_time.format("%H:%M"),
        )));
    }
    Ok(())
}

pub fn validate_name(field: &str, name: &str) -> ScheduleResult<()> {
    if name.trim().is_empty() {
        return Err(ScheduleError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct ActivityCatalog {
    activities: HashMap<Uuid, Activity>,
}

impl ActivityCatalog {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self {
            activities: activities
                .into_iter()
                .map(|activity| (activity.id, activity))
                .collect(),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&Activity> {
        self.activities.get(&id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.activities.contains_key(&id)
    }

    pub fn requires_outdoor(&self, id: Uuid) -> bool {
        self.get(id).is_some_and(|activity| activity.requires_outdoor)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

pub async fn create_time_slot<B>(backend: &B, request: &CreateTimeSlotRequest) -> ScheduleResult<TimeSlot>
where
    B: ScheduleDirectory + CatalogAdmin + ?Sized,
{
    validate_name("time slot name", &request.name)?;
    let catalog = SlotCatalog::new(backend.time_slots().await?);
    catalog.ensure_fits(request.start_time, request.end_time, None)?;

    let slot = backend.create_time_slot(request).await?;
    info!("Created time slot {} ({}-{})", slot.id, slot.start_time, slot.end_time);
    Ok(slot)
}

pub async fn update_time_slot<B>(
    backend: &B,
    id: Uuid,
    update: &UpdateTimeSlotRequest,
) -> ScheduleResult<TimeSlot>
where
    B: ScheduleDirectory + CatalogAdmin + ?Sized,
{
    let catalog = SlotCatalog::new(backend.time_slots().await?);
    let mut slot = catalog
        .get(id)
        .cloned()
        .ok_or_else(|| ScheduleError::NotFound(format!("Time slot with ID {} not found", id)))?;

    if let Some(name) = &update.name {
        validate_name("time slot name", name)?;
        slot.name = name.clone();
    }
    if let Some(start_time) = update.start_time {
        slot.start_time = start_time;
    }
    if let Some(end_time) = update.end_time {
        slot.end_time = end_time;
    }
    catalog.ensure_fits(slot.start_time, slot.end_time, Some(id))?;

    let slot = backend.update_time_slot(&slot).await?;
    info!("Updated time slot {}", slot.id);
    Ok(slot)
}

pub async fn delete_time_slot<B>(backend: &B, id: Uuid) -> ScheduleResult<()>
where
    B: CatalogAdmin + ?Sized,
{
    if !backend.delete_time_slot(id).await? {
        return Err(ScheduleError::NotFound(format!("Time slot with ID {} not found", id)));
    }
    info!("Deleted time slot {}", id);
    Ok(())
}

pub async fn create_activity<B>(backend: &B, request: &CreateActivityRequest) -> ScheduleResult<Activity>
where
    B: CatalogAdmin + ?Sized,
{
    validate_name("activity name", &request.name)?;
    let activity = backend.create_activity(request).await?;
    info!("Created activity {} ({})", activity.id, activity.name);
    Ok(activity)
}

pub async fn update_activity<B>(
    backend: &B,
    id: Uuid,
    update: &UpdateActivityRequest,
) -> ScheduleResult<Activity>
where
    B: ScheduleDirectory + CatalogAdmin + ?Sized,
{
    let catalog = ActivityCatalog::new(backend.activities().await?);
    let mut activity = catalog
        .get(id)
        .cloned()
        .ok_or_else(|| ScheduleError::NotFound(format!("Activity with ID {} not found", id)))?;

    if let Some(name) = &update.name {
        validate_name("activity name", name)?;
        activity.name = name.clone();
    }
    if let Some(description) = &update.description {
        activity.description = description.clone();
    }
    if let Some(requires_outdoor) = update.requires_outdoor {
        activity.requires_outdoor = requires_outdoor;
    }

    let activity = backend.update_activity(&activity).await?;
    info!("Updated activity {}", activity.id);
    Ok(activity)
}

pub async fn delete_activity<B>(backend: &B, id: Uuid) -> ScheduleResult<()>
where
    B: CatalogAdmin + ?Sized,
{
    if !backend.delete_activity(id).await? {
        return Err(ScheduleError::NotFound(format!("Activity with ID {} not found", id)));
    }
    info!("Deleted activity {}", id);
    Ok(())
}
