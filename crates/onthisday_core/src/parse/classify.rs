//! Single-line classification over plain article text.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^==([^=]+)==$").expect("valid heading regex"));
static SUB_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^===([^=]+)===$").expect("valid sub-heading regex"));
static EVENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*\s*(\d+(?:\s*(?:BCE|BC|AD|CE))?)\s*[–—]\s*(.+)$").expect("valid event regex")
});

/// Shape of one line of plain article text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `==Name==`, name trimmed.
    Heading(&'a str),
    /// `===Name===`, name trimmed.
    SubHeading(&'a str),
    /// `*YEAR – description`.
    Event {
        year: &'a str,
        description: &'a str,
    },
    /// One or more leading `*` with free text.
    Bullet { depth: usize },
    Unrecognized,
}

/// Classifies one line. Trailing whitespace is ignored.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim_end();

    if let Some(captures) = SUB_HEADING_RE.captures(line) {
        let name = captures.get(1).map_or("", |m| m.as_str());
        return LineKind::SubHeading(name.trim());
    }
    if let Some(captures) = HEADING_RE.captures(line) {
        let name = captures.get(1).map_or("", |m| m.as_str());
        return LineKind::Heading(name.trim());
    }
    if let Some(captures) = EVENT_RE.captures(line) {
        return LineKind::Event {
            year: captures.get(1).map_or("", |m| m.as_str()),
            description: captures.get(2).map_or("", |m| m.as_str().trim()),
        };
    }

    match bullet_depth(line) {
        0 => LineKind::Unrecognized,
        depth => LineKind::Bullet { depth },
    }
}

/// Number of leading `*` markers.
pub fn bullet_depth(line: &str) -> usize {
    line.chars().take_while(|c| *c == '*').count()
}
