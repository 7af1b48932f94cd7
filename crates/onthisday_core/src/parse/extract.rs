//! Section-scoped extraction state machine.
//!
//! # Responsibility
//! - Walk the plain-text line stream once and route event lines to the
//!   bucket of the current top-level heading.
//! - Hand the holidays bullet run to `HolidayFlattener`.
//!
//! # Invariants
//! - The first top-level heading outside the four categories ends extraction.
//! - An event line before any recognized heading is a structural error.
//! - Zero extracted events is reported as `ParseError::NoEvents`.

use crate::model::event::{CategorizedEvents, Category, EventEntry};
use crate::parse::classify::{classify_line, LineKind};
use crate::parse::holidays::HolidayFlattener;
use crate::parse::{ParseError, ParseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractState {
    BeforeHeading,
    InCategory(Category),
    HolidaysDelegated,
    Done,
}

impl ExtractState {
    fn on_heading(name: &str) -> Self {
        match Category::from_heading(name) {
            Some(Category::Holidays) => Self::HolidaysDelegated,
            Some(category) => Self::InCategory(category),
            None => Self::Done,
        }
    }
}

/// Extracts categorized events from plain article text.
#[derive(Debug, Clone, Default)]
pub struct SectionExtractor {
    flattener: HolidayFlattener,
}

impl SectionExtractor {
    pub fn new(flattener: HolidayFlattener) -> Self {
        Self { flattener }
    }

    /// Extractor joining holiday paths with `separator`.
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self::new(HolidayFlattener::new(separator))
    }

    pub fn extract(&self, text: &str) -> ParseResult<CategorizedEvents> {
        let lines: Vec<&str> = text.lines().collect();
        let mut events = CategorizedEvents::new();
        let mut state = ExtractState::BeforeHeading;
        let mut index = 0;

        while index < lines.len() && state != ExtractState::Done {
            let line = lines[index];
            index += 1;

            state = match classify_line(line) {
                LineKind::Heading(name) => ExtractState::on_heading(name),
                LineKind::Event { year, description } => match state {
                    ExtractState::InCategory(category) => {
                        events.push(category, EventEntry::new(year, description));
                        state
                    }
                    _ => return Err(ParseError::EventBeforeHeading(line.to_string())),
                },
                LineKind::SubHeading(_) | LineKind::Bullet { .. } | LineKind::Unrecognized => {
                    state
                }
            };

            if state == ExtractState::HolidaysDelegated {
                while index < lines.len() && lines[index].trim().is_empty() {
                    index += 1;
                }
                let outcome = self.flattener.flatten(lines[index..].iter().copied());
                index += outcome.consumed;
                events.extend(
                    Category::Holidays,
                    outcome.labels.into_iter().map(EventEntry::undated),
                );
                state = ExtractState::InCategory(Category::Holidays);
            }
        }

        if events.is_empty() {
            return Err(ParseError::NoEvents);
        }
        Ok(events)
    }
}

/// Extracts events using the default holiday separator.
pub fn extract_events(text: &str) -> ParseResult<CategorizedEvents> {
    SectionExtractor::default().extract(text)
}
