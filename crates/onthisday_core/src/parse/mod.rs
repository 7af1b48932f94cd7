//! Article parsing: plain-text line stream to categorized events.
//!
//! # Responsibility
//! - Reduce raw wikitext to plain-text lines (`wikitext`).
//! - Classify lines, flatten the holidays list, and walk sections.
//!
//! # Invariants
//! - A successful parse yields at least one event.
//! - Parsing is pure: no I/O, no logging of article content.

pub mod classify;
pub mod extract;
pub mod holidays;
pub mod wikitext;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use classify::{classify_line, LineKind};
pub use extract::{extract_events, SectionExtractor};
pub use holidays::{FlattenOutcome, HolidayFlattener, DEFAULT_SEPARATOR};
pub use wikitext::plain_text;

pub type ParseResult<T> = Result<T, ParseError>;

/// The article does not have the expected section structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An event line appeared before any recognized heading.
    EventBeforeHeading(String),
    /// No events were extracted from any recognized section.
    NoEvents,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventBeforeHeading(line) => {
                write!(f, "found event but missing heading: {line}")
            }
            Self::NoEvents => write!(f, "no events found in any recognized section"),
        }
    }
}

impl Error for ParseError {}
