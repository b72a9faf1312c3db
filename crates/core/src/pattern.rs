//! Template week → weekday pattern.
//!
//! A pattern records, for each weekday the template actually schedules, what
//! should happen to every slot of the catalog: assign an activity, or clear
//! the slot. A slot left empty in the template is an explicit `Clear`.

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::SlotCatalog;
use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::calendar::CalendarEntry;
use crate::models::weekday::{weekday_from_index, weekday_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SlotDirective {
    Assign {
        activity_id: Uuid,
        teacher_id: Option<Uuid>,
    },
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeekdayPattern {
    days: BTreeMap<u8, BTreeMap<Uuid, SlotDirective>>,
}

impl WeekdayPattern {
    pub fn day(&self, weekday: Weekday) -> Option<&BTreeMap<Uuid, SlotDirective>> {
        self.days.get(&weekday_index(weekday))
    }

    /// Weekdays carried by the pattern, Sunday first.
    pub fn weekdays(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.days.keys().filter_map(|index| weekday_from_index(*index))
    }

    pub fn is_empty(&self) -> bool {
        !self.days.values().any(|slots| {
            slots
                .values()
                .any(|directive| matches!(directive, SlotDirective::Assign { .. }))
        })
    }

    /// Every weekday row names every slot of `catalog`.
    pub fn is_total_for(&self, catalog: &SlotCatalog) -> bool {
        self.days
            .values()
            .all(|slots| catalog.ids().all(|id| slots.contains_key(&id)))
    }
}

/// Builds the weekday pattern for one template week.
///
/// Fails with [`ScheduleError::EmptyPattern`] when nothing in the template
/// is scheduled, so a propagation can never silently clear a whole range.
pub fn build_pattern(
    template: &[CalendarEntry],
    catalog: &SlotCatalog,
) -> ScheduleResult<WeekdayPattern> {
    ensure_single_week(template)?;

    let mut days: BTreeMap<u8, BTreeMap<Uuid, SlotDirective>> = BTreeMap::new();

    for entry in template {
        if let Some(activity_id) = entry.activity_id {
            days.entry(weekday_index(entry.date.weekday()))
                .or_default()
                .insert(
                    entry.slot_id,
                    SlotDirective::Assign {
                        activity_id,
                        teacher_id: entry.teacher_id,
                    },
                );
        }
    }

    for slots in days.values_mut() {
        for slot_id in catalog.ids() {
            slots.entry(slot_id).or_insert(SlotDirective::Clear);
        }
    }

    let pattern = WeekdayPattern { days };
    if pattern.is_empty() {
        return Err(ScheduleError::EmptyPattern);
    }

    debug!(
        "Built weekday pattern: weekdays={:?}, catalog_slots={}",
        pattern.weekdays().collect::<Vec<_>>(),
        catalog.len()
    );
    Ok(pattern)
}

fn ensure_single_week(template: &[CalendarEntry]) -> ScheduleResult<()> {
    let first = template.iter().map(|entry| entry.date).min();
    let last = template.iter().map(|entry| entry.date).max();

    if let (Some(first), Some(last)) = (first, last) {
        if (last - first).num_days() > 6 {
            return Err(ScheduleError::Validation(format!(
                "template entries span {} to {}, more than one week",
                first, last
            )));
        }
    }
    Ok(())
}
