use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::conflict::ConflictKind;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Start date {start} is in the past (today is {today})")]
    PastStartDate { start: NaiveDate, today: NaiveDate },

    #[error("End date {end} is after the class end date {class_end}")]
    BeyondClassEndDate { end: NaiveDate, class_end: NaiveDate },

    #[error("No date in the selected range falls on a selected weekday")]
    NoMatchingWeekdays,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Date {date} is in the past (today is {today})")]
    PastDate { date: NaiveDate, today: NaiveDate },

    #[error("Unknown class: {0}")]
    UnknownClass(Uuid),

    #[error("The template week has no scheduled activities to propagate")]
    EmptyPattern,

    #[error("The selected range produced no calendar changes")]
    NoDirectives,

    #[error("Scheduling conflict: {0}")]
    Conflict(ConflictKind),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Calendar store unavailable: {0}")]
    Transport(eyre::Report),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ScheduleError {
    /// Errors detected locally from the request alone, before any I/O.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ScheduleError::InvalidRange { .. }
                | ScheduleError::PastStartDate { .. }
                | ScheduleError::BeyondClassEndDate { .. }
                | ScheduleError::NoMatchingWeekdays
                | ScheduleError::MissingField(_)
                | ScheduleError::PastDate { .. }
                | ScheduleError::Validation(_)
        )
    }

    /// Pattern errors abort a propagation but are reported as warnings.
    pub fn is_warning(&self) -> bool {
        matches!(self, ScheduleError::EmptyPattern | ScheduleError::NoDirectives)
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
