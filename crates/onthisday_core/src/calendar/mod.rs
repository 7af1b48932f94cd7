//! Daily "on this day" calendar assembly and serialization.
//!
//! # Responsibility
//! - Sample events per day and category and format one entry per day.
//! - Hand the ordered entries to a `CalendarSink`.
//!
//! # Invariants
//! - Entries are emitted in date order, one per date of the inclusive range.
//! - Categories with a zero or unset count never appear in an entry.

pub mod assemble;
pub mod ics;

use crate::repo::event_repo::RepoError;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use assemble::{build_calendar, CalendarRequest, CategoryCounts, DailyEntry};
pub use ics::{CalendarSink, IcsCalendarSink};

pub type CalendarResult<T> = Result<T, CalendarError>;

#[derive(Debug)]
pub enum CalendarError {
    InvalidRange { start: NaiveDate, end: NaiveDate },
    InvalidTime { hour: u32, minute: u32 },
    /// The daily time does not exist on this date in the requested timezone.
    NonexistentLocalTime { date: NaiveDate },
    Repo(RepoError),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange { start, end } => {
                write!(f, "start date {start} must not be after end date {end}")
            }
            Self::InvalidTime { hour, minute } => {
                write!(f, "invalid time of day {hour:02}:{minute:02}")
            }
            Self::NonexistentLocalTime { date } => {
                write!(f, "daily time does not exist on {date} in the requested timezone")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CalendarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CalendarError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
