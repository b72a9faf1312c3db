use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub slot_id: Uuid,
    /// `None` means the slot is not scheduled.
    pub activity_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
}

impl CalendarEntry {
    pub fn key(&self) -> EntryKey {
        EntryKey {
            class_id: self.class_id,
            date: self.date,
            slot_id: self.slot_id,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.activity_id.is_some()
    }
}

/// Natural key of a calendar entry; at most one entry exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryKey {
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub slot_id: Uuid,
}

/// A validated single-entry write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAssignment {
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub slot_id: Uuid,
    pub activity_id: Uuid,
    pub teacher_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDirective {
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub slot_id: Uuid,
    pub activity_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    /// Remove whatever is stored at the key instead of writing.
    pub delete: bool,
}

impl BulkDirective {
    pub fn key(&self) -> EntryKey {
        EntryKey {
            class_id: self.class_id,
            date: self.date,
            slot_id: self.slot_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveError {
    pub directive_index: usize,
    pub reason: String,
}

/// What the store reports back for one bulk submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkWriteReport {
    pub success_count: usize,
    pub error_count: usize,
    #[serde(default)]
    pub errors: Vec<DirectiveError>,
}

impl BulkWriteReport {
    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_error(&mut self, directive_index: usize, reason: impl Into<String>) {
        self.error_count += 1;
        self.errors.push(DirectiveError {
            directive_index,
            reason: reason.into(),
        });
    }
}
