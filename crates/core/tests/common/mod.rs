#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use kinder_core::{
    conflict::ConflictKind,
    models::{
        activity::Activity,
        calendar::{BulkDirective, BulkWriteReport, CalendarEntry, EntryAssignment},
        class::{ClassSummary, Teacher},
        time_slot::TimeSlot,
    },
    store::{CalendarStore, ScheduleDirectory, StoreError},
};
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

pub fn slot(name: &str, start: (u32, u32), end: (u32, u32)) -> TimeSlot {
    TimeSlot {
        id: Uuid::new_v4(),
        name: name.to_string(),
        start_time: time(start.0, start.1),
        end_time: time(end.0, end.1),
    }
}

pub fn activity(name: &str) -> Activity {
    Activity {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: String::new(),
        requires_outdoor: false,
    }
}

pub fn entry(
    class_id: Uuid,
    date: NaiveDate,
    slot_id: Uuid,
    activity_id: Option<Uuid>,
) -> CalendarEntry {
    CalendarEntry {
        class_id,
        date,
        slot_id,
        activity_id,
        teacher_id: None,
    }
}

type Rejector = Box<dyn Fn(&BulkDirective) -> Option<String> + Send + Sync>;

/// Hand-rolled backend: configurable catalog, rejection rule and failures,
/// and a record of every batch it received.
pub struct FakeBackend {
    pub slots: Mutex<Vec<TimeSlot>>,
    pub activities: Vec<Activity>,
    pub class: Option<ClassSummary>,
    pub template: Vec<CalendarEntry>,
    pub reject: Rejector,
    pub fail_transport: bool,
    pub upsert_conflict: Option<ConflictKind>,
    pub batches: Mutex<Vec<Vec<BulkDirective>>>,
    pub upserts: Mutex<Vec<EntryAssignment>>,
}

impl FakeBackend {
    pub fn new(slots: Vec<TimeSlot>, class: ClassSummary) -> Self {
        Self {
            slots: Mutex::new(slots),
            activities: Vec::new(),
            class: Some(class),
            template: Vec::new(),
            reject: Box::new(|_| None),
            fail_transport: false,
            upsert_conflict: None,
            batches: Mutex::new(Vec::new()),
            upserts: Mutex::new(Vec::new()),
        }
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    pub fn last_batch(&self) -> Vec<BulkDirective> {
        self.batches.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

pub fn class(end_date: Option<NaiveDate>) -> ClassSummary {
    ClassSummary {
        id: Uuid::new_v4(),
        name: "Sunflowers".to_string(),
        end_date,
        homeroom_teacher_id: Some(Uuid::new_v4()),
    }
}

#[async_trait]
impl ScheduleDirectory for FakeBackend {
    async fn time_slots(&self) -> eyre::Result<Vec<TimeSlot>> {
        Ok(self.slots.lock().unwrap().clone())
    }

    async fn activities(&self) -> eyre::Result<Vec<Activity>> {
        Ok(self.activities.clone())
    }

    async fn teachers(&self) -> eyre::Result<Vec<Teacher>> {
        Ok(Vec::new())
    }

    async fn find_class(&self, class_id: Uuid) -> eyre::Result<Option<ClassSummary>> {
        Ok(self.class.clone().filter(|class| class.id == class_id))
    }

    async fn class_end_date(&self, class_id: Uuid) -> eyre::Result<Option<NaiveDate>> {
        Ok(self.find_class(class_id).await?.and_then(|class| class.end_date))
    }

    async fn template_week_entries(
        &self,
        _class_id: Uuid,
        _week_start: NaiveDate,
    ) -> eyre::Result<Vec<CalendarEntry>> {
        Ok(self.template.clone())
    }
}

#[async_trait]
impl CalendarStore for FakeBackend {
    async fn bulk_upsert(&self, directives: &[BulkDirective]) -> eyre::Result<BulkWriteReport> {
        if self.fail_transport {
            return Err(eyre::eyre!("connection reset by peer"));
        }
        self.batches.lock().unwrap().push(directives.to_vec());

        let mut report = BulkWriteReport::default();
        for (index, directive) in directives.iter().enumerate() {
            match (self.reject)(directive) {
                Some(reason) => report.record_error(index, reason),
                None => report.record_success(),
            }
        }
        Ok(report)
    }

    async fn upsert_entry(&self, assignment: &EntryAssignment) -> Result<CalendarEntry, StoreError> {
        if self.fail_transport {
            return Err(StoreError::Transport(eyre::eyre!("connection reset by peer")));
        }
        if let Some(kind) = &self.upsert_conflict {
            return Err(StoreError::Conflict(kind.clone()));
        }
        self.upserts.lock().unwrap().push(assignment.clone());
        Ok(CalendarEntry {
            class_id: assignment.class_id,
            date: assignment.date,
            slot_id: assignment.slot_id,
            activity_id: Some(assignment.activity_id),
            teacher_id: assignment.teacher_id,
        })
    }
}
