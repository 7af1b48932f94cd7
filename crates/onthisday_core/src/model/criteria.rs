//! Query criteria and shared validation rules.
//!
//! # Responsibility
//! - Convert raw caller input (strings) into typed criteria.
//! - Reject malformed month/date/category/count values with a field-specific
//!   error.
//!
//! # Invariants
//! - Validation is a fixed point: validating already-normalized criteria
//!   yields equal criteria.
//! - A `date` is never accepted past the canonical day count of the given
//!   month.

use crate::model::date::{validate_day, Month};
use crate::model::event::Category;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller input error. Never retried and never logged as a system failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Month(String),
    Date(String),
    DateForMonth { month: Month, date: i64 },
    Category(String),
    Count(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Month(value) => write!(f, "invalid month: \"{value}\""),
            Self::Date(value) => write!(f, "invalid date: \"{value}\""),
            Self::DateForMonth { month, date } => {
                write!(f, "invalid date for month {month}: \"{date}\"")
            }
            Self::Category(value) => write!(f, "invalid category: \"{value}\""),
            Self::Count(value) => {
                write!(f, "count must be an integer greater than 0 (not \"{value}\")")
            }
        }
    }
}

impl Error for ValidationError {}

/// Unvalidated criteria as received from a CLI or HTTP layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCriteria {
    pub month: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
}

/// Validated event filter. `None` means "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCriteria {
    pub month: Option<Month>,
    pub date: Option<u32>,
    pub category: Option<Category>,
}

impl EventCriteria {
    /// Criteria matching every event.
    pub fn any() -> Self {
        Self::default()
    }

    /// Builds criteria from typed parts, checking `date` against `month`.
    pub fn new(
        month: Option<Month>,
        date: Option<u32>,
        category: Option<Category>,
    ) -> Result<Self, ValidationError> {
        let date = date
            .map(|value| validate_day(month, i64::from(value)))
            .transpose()?;
        Ok(Self {
            month,
            date,
            category,
        })
    }

    /// Converts back into raw string form.
    pub fn to_raw(&self) -> RawCriteria {
        RawCriteria {
            month: self.month.map(|month| month.name().to_string()),
            date: self.date.map(|date| date.to_string()),
            category: self.category.map(|category| category.heading().to_string()),
        }
    }
}

/// Validates raw criteria, normalizing month case and parsing the date.
pub fn validate_criteria(raw: &RawCriteria) -> Result<EventCriteria, ValidationError> {
    let month = raw.month.as_deref().map(Month::parse).transpose()?;

    let date = match raw.date.as_deref() {
        Some(value) => {
            let parsed = value
                .trim()
                .parse::<i64>()
                .map_err(|_| ValidationError::Date(value.to_string()))?;
            Some(validate_day(month, parsed)?)
        }
        None => None,
    };

    let category = raw.category.as_deref().map(Category::parse).transpose()?;

    Ok(EventCriteria {
        month,
        date,
        category,
    })
}

/// Parses a sample count supplied as text.
pub fn parse_count(value: &str) -> Result<u32, ValidationError> {
    let parsed = value
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::Count(value.to_string()))?;
    validate_count(parsed)
}

/// Rejects counts below 1.
pub fn validate_count(count: i64) -> Result<u32, ValidationError> {
    if count < 1 {
        return Err(ValidationError::Count(count.to_string()));
    }
    u32::try_from(count).map_err(|_| ValidationError::Count(count.to_string()))
}
