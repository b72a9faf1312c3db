use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kinder_core::models::{
    activity::Activity,
    calendar::CalendarEntry,
    class::{ClassSummary, Teacher},
    time_slot::TimeSlot,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl From<DbTimeSlot> for TimeSlot {
    fn from(row: DbTimeSlot) -> Self {
        TimeSlot {
            id: row.id,
            name: row.name,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbActivity {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub requires_outdoor: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbActivity> for Activity {
    fn from(row: DbActivity) -> Self {
        Activity {
            id: row.id,
            name: row.name,
            description: row.description,
            requires_outdoor: row.requires_outdoor,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeacher {
    pub id: Uuid,
    pub name: String,
    pub specialization: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbTeacher> for Teacher {
    fn from(row: DbTeacher) -> Self {
        Teacher {
            id: row.id,
            name: row.name,
            specialization: row.specialization,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClass {
    pub id: Uuid,
    pub name: String,
    pub end_date: Option<NaiveDate>,
    pub homeroom_teacher_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<DbClass> for ClassSummary {
    fn from(row: DbClass) -> Self {
        ClassSummary {
            id: row.id,
            name: row.name,
            end_date: row.end_date,
            homeroom_teacher_id: row.homeroom_teacher_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCalendarEntry {
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub slot_id: Uuid,
    pub activity_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbCalendarEntry> for CalendarEntry {
    fn from(row: DbCalendarEntry) -> Self {
        CalendarEntry {
            class_id: row.class_id,
            date: row.date,
            slot_id: row.slot_id,
            activity_id: row.activity_id,
            teacher_id: row.teacher_id,
        }
    }
}
