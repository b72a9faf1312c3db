//! Expands a date range and a weekday selection into concrete dates.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::weekday::WeekdaySet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeRequest {
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub weekdays: WeekdaySet,
}

/// The validated result of an expansion.
///
/// Holds only the bounds; iterating it is lazy and can be restarted as
/// often as needed. Dates come out in ascending calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedDates {
    start: NaiveDate,
    end: NaiveDate,
    weekdays: WeekdaySet,
}

impl ExpandedDates {
    pub fn iter(&self) -> MatchingDates {
        MatchingDates {
            next: Some(self.start),
            end: self.end,
            weekdays: self.weekdays,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn weekdays(&self) -> WeekdaySet {
        self.weekdays
    }

    /// Exact number of dates the iterator yields, without walking the range.
    pub fn len(&self) -> usize {
        count_matching(self.start, self.end, self.weekdays)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> IntoIterator for &'a ExpandedDates {
    type Item = NaiveDate;
    type IntoIter = MatchingDates;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct MatchingDates {
    next: Option<NaiveDate>,
    end: NaiveDate,
    weekdays: WeekdaySet,
}

impl Iterator for MatchingDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        loop {
            let date = self.next.filter(|date| *date <= self.end)?;
            self.next = date.succ_opt();
            if self.weekdays.contains(date.weekday()) {
                return Some(date);
            }
        }
    }
}

/// Validates the range against `today` and the class end date, then
/// returns the matching dates.
pub fn expand_dates(
    request: &DateRangeRequest,
    today: NaiveDate,
    class_end_date: Option<NaiveDate>,
) -> ScheduleResult<ExpandedDates> {
    let DateRangeRequest {
        start_date,
        end_date,
        weekdays,
    } = *request;

    if start_date > end_date {
        return Err(ScheduleError::InvalidRange {
            start: start_date,
            end: end_date,
        });
    }
    if start_date < today {
        return Err(ScheduleError::PastStartDate {
            start: start_date,
            today,
        });
    }
    if let Some(class_end) = class_end_date {
        if end_date > class_end {
            return Err(ScheduleError::BeyondClassEndDate {
                end: end_date,
                class_end,
            });
        }
    }

    let dates = ExpandedDates {
        start: start_date,
        end: end_date,
        weekdays,
    };
    if dates.is_empty() {
        return Err(ScheduleError::NoMatchingWeekdays);
    }
    Ok(dates)
}

fn count_matching(start: NaiveDate, end: NaiveDate, weekdays: WeekdaySet) -> usize {
    if start > end || weekdays.is_empty() {
        return 0;
    }

    let total_days = (end - start).num_days() as usize + 1;
    let full_weeks = total_days / 7;
    let remainder = total_days % 7;

    let tail = start
        .iter_days()
        .take(remainder)
        .filter(|date| weekdays.contains(date.weekday()))
        .count();

    full_weeks * weekdays.len() + tail
}
