//! Domain conflicts reported by the calendar store.
//!
//! Stores reject individual writes with a free-form reason string. The
//! reasons below are the ones both backends emit; [`ConflictKind::classify`]
//! turns any reason back into a kind the caller can act on.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MISSING_HOMEROOM_TEACHER: &str = "class has no homeroom teacher assigned";
pub const TEACHER_DOUBLE_BOOKED: &str = "slot time overlaps an existing entry for this teacher";
pub const SLOT_NO_LONGER_EXISTS: &str = "slot no longer exists";
pub const DUPLICATE_ENTRY: &str = "entry already exists for this class, date and slot";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum ConflictKind {
    MissingHomeroomTeacher,
    TeacherDoubleBooked,
    SlotNoLongerExists,
    DuplicateEntry,
    Other(String),
}

impl ConflictKind {
    pub fn classify(reason: &str) -> Self {
        let normalized = reason.trim().to_lowercase();
        if normalized.contains("homeroom") {
            ConflictKind::MissingHomeroomTeacher
        } else if normalized.contains("overlap") {
            ConflictKind::TeacherDoubleBooked
        } else if normalized.contains("slot no longer exists") {
            ConflictKind::SlotNoLongerExists
        } else if normalized.contains("already exists") {
            ConflictKind::DuplicateEntry
        } else {
            ConflictKind::Other(reason.trim().to_string())
        }
    }

    /// The reason string a store reports for this kind.
    pub fn reason(&self) -> &str {
        match self {
            ConflictKind::MissingHomeroomTeacher => MISSING_HOMEROOM_TEACHER,
            ConflictKind::TeacherDoubleBooked => TEACHER_DOUBLE_BOOKED,
            ConflictKind::SlotNoLongerExists => SLOT_NO_LONGER_EXISTS,
            ConflictKind::DuplicateEntry => DUPLICATE_ENTRY,
            ConflictKind::Other(reason) => reason,
        }
    }

    /// What the user can do about it.
    pub fn hint(&self) -> &'static str {
        match self {
            ConflictKind::MissingHomeroomTeacher => {
                "assign a homeroom teacher to the class or pick a teacher for the slot"
            }
            ConflictKind::TeacherDoubleBooked => {
                "choose another teacher or move the other class's activity"
            }
            ConflictKind::SlotNoLongerExists => "reload the time slot list and try again",
            ConflictKind::DuplicateEntry => "reload the calendar and edit the existing entry",
            ConflictKind::Other(_) => "check the calendar and try again",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}
