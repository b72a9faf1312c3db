//! Bulk reconciliation: weekday pattern × expanded dates → one batch write.
//!
//! The store applies every directive independently and may reject some of
//! them. Rejections are data, never errors: the outcome distinguishes full
//! success, partial success and full failure.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::SlotCatalog;
use crate::conflict::{ConflictKind, SLOT_NO_LONGER_EXISTS};
use crate::errors::{ScheduleError, ScheduleResult};
use crate::expand::{DateRangeRequest, ExpandedDates, expand_dates};
use crate::models::{
    calendar::{BulkDirective, BulkWriteReport, DirectiveError},
    class::ClassSummary,
    payload::{EntryPayload, entries_from_payloads},
    weekday::{WeekdaySet, weekday_index},
};
use crate::pattern::{SlotDirective, WeekdayPattern, build_pattern};
use crate::store::{CalendarStore, ScheduleDirectory};

/// Crosses the pattern with every expanded date.
///
/// Dates whose weekday has no row in the pattern are skipped, even when the
/// caller selected that weekday.
pub fn plan_directives(
    class_id: Uuid,
    pattern: &WeekdayPattern,
    dates: &ExpandedDates,
) -> ScheduleResult<Vec<BulkDirective>> {
    let mut directives = Vec::new();

    for date in dates {
        let Some(slots) = pattern.day(date.weekday()) else {
            continue;
        };
        for (slot_id, directive) in slots {
            directives.push(match *directive {
                SlotDirective::Assign {
                    activity_id,
                    teacher_id,
                } => BulkDirective {
                    class_id,
                    date,
                    slot_id: *slot_id,
                    activity_id: Some(activity_id),
                    teacher_id,
                    delete: false,
                },
                SlotDirective::Clear => BulkDirective {
                    class_id,
                    date,
                    slot_id: *slot_id,
                    activity_id: None,
                    teacher_id: None,
                    delete: true,
                },
            });
        }
    }

    if directives.is_empty() {
        return Err(ScheduleError::NoDirectives);
    }
    Ok(directives)
}

/// One rejected directive, with enough context to point at the occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveFailure {
    pub directive_index: usize,
    pub date: Option<NaiveDate>,
    pub slot_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub reason: String,
    pub conflict: ConflictKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PropagationOutcome {
    Success {
        written: usize,
    },
    Partial {
        success_count: usize,
        error_count: usize,
        errors: Vec<DirectiveFailure>,
    },
    /// Counts are left out; nothing was written.
    Failure {
        errors: Vec<DirectiveFailure>,
    },
}

impl PropagationOutcome {
    pub fn from_report(report: &BulkWriteReport, directives: &[BulkDirective]) -> Self {
        let errors: Vec<DirectiveFailure> = report
            .errors
            .iter()
            .map(|error| {
                let directive = directives.get(error.directive_index);
                DirectiveFailure {
                    directive_index: error.directive_index,
                    date: directive.map(|d| d.date),
                    slot_id: directive.map(|d| d.slot_id),
                    teacher_id: directive.and_then(|d| d.teacher_id),
                    reason: error.reason.clone(),
                    conflict: ConflictKind::classify(&error.reason),
                }
            })
            .collect();

        if report.error_count == 0 {
            PropagationOutcome::Success {
                written: report.success_count,
            }
        } else if report.success_count > 0 {
            PropagationOutcome::Partial {
                success_count: report.success_count,
                error_count: report.error_count,
                errors,
            }
        } else {
            PropagationOutcome::Failure { errors }
        }
    }

    /// Only a partial write leaves views showing stale data.
    pub fn needs_refresh(&self) -> bool {
        matches!(self, PropagationOutcome::Partial { .. })
    }

    pub fn message(&self) -> String {
        match self {
            PropagationOutcome::Success { written } => {
                format!("Scheduled {} occurrence(s).", written)
            }
            PropagationOutcome::Partial {
                success_count,
                error_count,
                ..
            } => format!(
                "Scheduled {} occurrence(s); {} could not be written. \
                 The affected dates or teachers likely have conflicts.",
                success_count, error_count
            ),
            PropagationOutcome::Failure { errors } => {
                let hint = dominant_conflict(errors)
                    .map(|kind| kind.hint())
                    .unwrap_or("check the calendar and try again");
                format!("Nothing could be scheduled: {}.", hint)
            }
        }
    }
}

fn dominant_conflict(errors: &[DirectiveFailure]) -> Option<&ConflictKind> {
    let mut tally: HashMap<&ConflictKind, usize> = HashMap::new();
    for error in errors {
        *tally.entry(&error.conflict).or_default() += 1;
    }
    // Ties resolve to the kind seen first.
    errors
        .iter()
        .map(|error| &error.conflict)
        .max_by_key(|kind| (tally[kind], std::cmp::Reverse(first_index(errors, kind))))
}

fn first_index(errors: &[DirectiveFailure], kind: &ConflictKind) -> usize {
    errors
        .iter()
        .position(|error| &error.conflict == kind)
        .unwrap_or(usize::MAX)
}

/// Submits planned directives against the live catalog.
pub struct BulkReconciler<'a, D: ?Sized, S: ?Sized> {
    directory: &'a D,
    store: &'a S,
}

impl<'a, D, S> BulkReconciler<'a, D, S>
where
    D: ScheduleDirectory + ?Sized,
    S: CalendarStore + ?Sized,
{
    pub fn new(directory: &'a D, store: &'a S) -> Self {
        Self { directory, store }
    }

    /// Drops directives whose slot vanished since planning, sends the rest
    /// as one batch and folds both into a single outcome.
    pub async fn submit(&self, directives: &[BulkDirective]) -> ScheduleResult<PropagationOutcome> {
        if directives.is_empty() {
            return Err(ScheduleError::NoDirectives);
        }

        let catalog = SlotCatalog::new(
            self.directory
                .time_slots()
                .await
                .map_err(ScheduleError::Transport)?,
        );

        let mut report = BulkWriteReport::default();
        let mut kept_indices = Vec::with_capacity(directives.len());
        let mut kept = Vec::with_capacity(directives.len());
        for (index, directive) in directives.iter().enumerate() {
            if catalog.contains(directive.slot_id) {
                kept_indices.push(index);
                kept.push(directive.clone());
            } else {
                warn!(
                    "Dropping directive {} for {}: slot {} no longer exists",
                    index, directive.date, directive.slot_id
                );
                report.record_error(index, SLOT_NO_LONGER_EXISTS);
            }
        }

        if !kept.is_empty() {
            debug!("Submitting {} calendar directive(s)", kept.len());
            let store_report = self
                .store
                .bulk_upsert(&kept)
                .await
                .map_err(ScheduleError::Transport)?;

            report.success_count += store_report.success_count;
            report.error_count += store_report.error_count;
            for error in store_report.errors {
                let original = kept_indices
                    .get(error.directive_index)
                    .copied()
                    .unwrap_or(error.directive_index);
                report.errors.push(DirectiveError {
                    directive_index: original,
                    reason: error.reason,
                });
            }
            report.errors.sort_by_key(|error| error.directive_index);
        }

        let outcome = PropagationOutcome::from_report(&report, directives);
        info!(
            "Bulk calendar write finished: success={}, errors={}",
            report.success_count, report.error_count
        );
        Ok(outcome)
    }
}

/// A request to copy a template week forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationRequest {
    /// First day of the stored week used as template.
    pub template_week_start: NaiveDate,
    /// The week as currently shown, when it should be used instead of the
    /// stored one.
    #[serde(default)]
    pub template: Option<Vec<EntryPayload>>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weekdays: WeekdaySet,
}

impl PropagationRequest {
    pub fn range(&self) -> DateRangeRequest {
        DateRangeRequest {
            start_date: self.start_date,
            end_date: self.end_date,
            weekdays: self.weekdays,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PropagationPlan {
    pub class: ClassSummary,
    pub pattern: WeekdayPattern,
    pub dates: ExpandedDates,
    pub directives: Vec<BulkDirective>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationPreview {
    pub target_dates: Vec<NaiveDate>,
    /// Selected dates whose weekday the template does not schedule.
    pub skipped_dates: Vec<NaiveDate>,
    pub template_weekdays: WeekdaySet,
    pub directive_count: usize,
    pub assign_count: usize,
    pub clear_count: usize,
}

impl PropagationPlan {
    pub fn preview(&self) -> PropagationPreview {
        let template_weekdays: WeekdaySet = self.pattern.weekdays().collect();
        let (target_dates, skipped_dates): (Vec<NaiveDate>, Vec<NaiveDate>) = self
            .dates
            .iter()
            .partition(|date| template_weekdays.contains(date.weekday()));
        let clear_count = self.directives.iter().filter(|d| d.delete).count();

        PropagationPreview {
            target_dates,
            skipped_dates,
            template_weekdays,
            directive_count: self.directives.len(),
            assign_count: self.directives.len() - clear_count,
            clear_count,
        }
    }
}

/// Resolves the class, builds the pattern, expands the range and plans the
/// directives. Reads only; nothing is written.
pub async fn plan_propagation<D>(
    directory: &D,
    class_id: Uuid,
    request: &PropagationRequest,
    today: NaiveDate,
) -> ScheduleResult<PropagationPlan>
where
    D: ScheduleDirectory + ?Sized,
{
    let range = request.range();
    expand_dates(&range, today, None)?;

    let class = directory
        .find_class(class_id)
        .await?
        .ok_or(ScheduleError::UnknownClass(class_id))?;
    let dates = expand_dates(&range, today, class.end_date)?;
    let catalog = SlotCatalog::new(directory.time_slots().await?);

    let template = match &request.template {
        Some(payloads) => entries_from_payloads(class_id, payloads.clone())?,
        None => {
            directory
                .template_week_entries(class_id, request.template_week_start)
                .await?
        }
    };

    let pattern = build_pattern(&template, &catalog)?;
    let directives = plan_directives(class_id, &pattern, &dates)?;

    debug!(
        "Planned propagation for class {}: dates={}, directives={}, weekdays={:?}",
        class_id,
        dates.len(),
        directives.len(),
        pattern.weekdays().map(weekday_index).collect::<Vec<_>>()
    );

    Ok(PropagationPlan {
        class,
        pattern,
        dates,
        directives,
    })
}

pub async fn preview_propagation<D>(
    directory: &D,
    class_id: Uuid,
    request: &PropagationRequest,
    today: NaiveDate,
) -> ScheduleResult<PropagationPreview>
where
    D: ScheduleDirectory + ?Sized,
{
    Ok(plan_propagation(directory, class_id, request, today)
        .await?
        .preview())
}

/// Plans and submits a propagation in one go.
pub async fn propagate_template_week<B>(
    backend: &B,
    class_id: Uuid,
    request: &PropagationRequest,
    today: NaiveDate,
) -> ScheduleResult<PropagationOutcome>
where
    B: ScheduleDirectory + CalendarStore + ?Sized,
{
    let plan = plan_propagation(backend, class_id, request, today).await?;
    let outcome = BulkReconciler::new(backend, backend)
        .submit(&plan.directives)
        .await?;

    info!(
        "Propagated template week {} for class {}: {}",
        request.template_week_start,
        class_id,
        outcome.message()
    );
    Ok(outcome)
}
