//! Event categories and records.
//!
//! # Invariants
//! - `year` is opaque text; it is never parsed as a number.
//! - `CategorizedEvents` always carries all four buckets.

use crate::model::criteria::ValidationError;
use crate::model::date::{Month, MonthDay};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Revision identifier of an upstream article.
pub type RevisionId = i64;

/// Classification of a historical event, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Births,
    Deaths,
    Events,
    Holidays,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Births,
        Category::Deaths,
        Category::Events,
        Category::Holidays,
    ];

    /// Canonical name, identical to the article's section heading.
    pub fn heading(self) -> &'static str {
        match self {
            Self::Births => "Births",
            Self::Deaths => "Deaths",
            Self::Events => "Events",
            Self::Holidays => "Holidays and observances",
        }
    }

    /// Position in `Category::ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Matches a trimmed top-level heading against the recognized sections.
    pub fn from_heading(heading: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.heading() == heading)
    }

    /// Parses a canonical category name; no case folding is applied.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        Self::from_heading(value).ok_or_else(|| ValidationError::Category(value.to_string()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.heading())
    }
}

/// One `(year, description)` pair as extracted from an article.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventEntry {
    /// Empty for holidays and observances.
    pub year: String,
    pub description: String,
}

impl EventEntry {
    pub fn new(year: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            description: description.into(),
        }
    }

    /// Entry without a year, as produced for holidays.
    pub fn undated(description: impl Into<String>) -> Self {
        Self::new(String::new(), description)
    }

    /// Renders `YEAR: description`, or just the description when undated.
    pub fn format_line(&self) -> String {
        if self.year.is_empty() {
            self.description.clone()
        } else {
            format!("{}: {}", self.year, self.description)
        }
    }
}

/// Persisted event row with its date and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub month: Month,
    pub day: u32,
    pub category: Category,
    pub year: String,
    pub description: String,
}

impl EventRecord {
    pub fn new(date: MonthDay, category: Category, entry: EventEntry) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
            category,
            year: entry.year,
            description: entry.description,
        }
    }

    pub fn entry(&self) -> EventEntry {
        EventEntry::new(self.year.clone(), self.description.clone())
    }

    pub fn into_entry(self) -> EventEntry {
        EventEntry {
            year: self.year,
            description: self.description,
        }
    }
}

/// Events extracted from one article, bucketed by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedEvents {
    buckets: BTreeMap<Category, Vec<EventEntry>>,
}

impl Default for CategorizedEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl CategorizedEvents {
    /// Creates four empty buckets.
    pub fn new() -> Self {
        Self {
            buckets: Category::ALL
                .iter()
                .map(|category| (*category, Vec::new()))
                .collect(),
        }
    }

    pub fn push(&mut self, category: Category, entry: EventEntry) {
        self.buckets.entry(category).or_default().push(entry);
    }

    pub fn extend(&mut self, category: Category, entries: impl IntoIterator<Item = EventEntry>) {
        self.buckets.entry(category).or_default().extend(entries);
    }

    pub fn get(&self, category: Category) -> &[EventEntry] {
        self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total entries across all buckets.
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterates `(category, entry)` pairs in category order, then source order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &EventEntry)> {
        self.buckets
            .iter()
            .flat_map(|(category, entries)| entries.iter().map(move |entry| (*category, entry)))
    }
}
