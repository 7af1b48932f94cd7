//! Canonical calendar keys.
//!
//! # Responsibility
//! - Map month names to canonical day counts.
//! - Provide the validated `(month, day)` key used by storage and sampling.
//!
//! # Invariants
//! - Day counts are year-agnostic: February always has 29 days.
//! - `MonthDay::ordinal()` is dense over `0..DAYS_IN_CANONICAL_YEAR`.

use crate::model::criteria::ValidationError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Number of distinct `(month, day)` keys, leap day included.
pub const DAYS_IN_CANONICAL_YEAR: usize = 366;

/// Largest day number any month can have.
pub const MAX_DAY: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Canonical English month name, as used in article titles.
    pub fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    /// 1-based month number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Canonical day count. February is 29 regardless of year.
    pub fn days(self) -> u32 {
        match self {
            Self::February => 29,
            Self::April | Self::June | Self::September | Self::November => 30,
            _ => 31,
        }
    }

    pub fn from_number(number: u32) -> Option<Self> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        Self::ALL.get(index).copied()
    }

    /// Parses a month name after title-case normalization.
    ///
    /// `"fEbRuARy"` and `"february"` both yield `Month::February`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let normalized = title_case(value.trim());
        Self::ALL
            .iter()
            .copied()
            .find(|month| month.name() == normalized)
            .ok_or(ValidationError::Month(normalized))
    }

    /// Days elapsed in the canonical year before the first of this month.
    fn ordinal_offset(self) -> u32 {
        Self::ALL
            .iter()
            .take_while(|month| **month != self)
            .map(|month| month.days())
            .sum()
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated `(month, day)` key for one per-date article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthDay {
    month: Month,
    day: u32,
}

impl MonthDay {
    /// Builds a key, rejecting days outside `1..=month.days()`.
    pub fn new(month: Month, day: u32) -> Result<Self, ValidationError> {
        validate_day(Some(month), i64::from(day))?;
        Ok(Self { month, day })
    }

    pub fn month(self) -> Month {
        self.month
    }

    pub fn day(self) -> u32 {
        self.day
    }

    /// Article title for this date, e.g. `February_29`.
    pub fn page_title(self) -> String {
        format!("{}_{}", self.month.name(), self.day)
    }

    /// Dense index in `0..DAYS_IN_CANONICAL_YEAR`.
    pub fn ordinal(self) -> usize {
        (self.month.ordinal_offset() + self.day - 1) as usize
    }

    /// Canonical key for a concrete calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        let month = Month::ALL[date.month0() as usize];
        Self {
            month,
            day: date.day(),
        }
    }

    /// Every canonical date from January 1 to December 31, leap day included.
    pub fn all() -> impl Iterator<Item = MonthDay> {
        Month::ALL
            .into_iter()
            .flat_map(|month| (1..=month.days()).map(move |day| MonthDay { month, day }))
    }
}

impl Display for MonthDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month, self.day)
    }
}

/// Checks a day number against an optional month.
///
/// Without a month the upper bound is `MAX_DAY`.
pub fn validate_day(month: Option<Month>, day: i64) -> Result<u32, ValidationError> {
    if day < 1 {
        return Err(ValidationError::Date(day.to_string()));
    }
    let limit = month.map_or(MAX_DAY, Month::days);
    if day > i64::from(limit) {
        return Err(match month {
            Some(month) => ValidationError::DateForMonth { month, date: day },
            None => ValidationError::Date(day.to_string()),
        });
    }
    Ok(day as u32)
}

fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
