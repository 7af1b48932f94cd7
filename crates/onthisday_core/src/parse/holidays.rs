//! Holiday list flattening.
//!
//! # Responsibility
//! - Rebuild the tree implied by bullet depth in "Holidays and observances".
//! - Emit one joined label per root-to-leaf path, in source order.
//!
//! # Invariants
//! - Output strings never start or end with the separator.
//! - Orphaned deep items (depth jumps of more than one) are skipped, never
//!   raised.
//! - The first depth-0 line ends the run and is not consumed.

use crate::parse::classify::bullet_depth;

/// Separator placed between path labels.
pub const DEFAULT_SEPARATOR: &str = " - ";

/// Result of flattening one bullet run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenOutcome {
    pub labels: Vec<String>,
    /// Lines consumed from the input, excluding the terminator.
    pub consumed: usize,
}

/// Stack-based flattener for nested bullet lists.
#[derive(Debug, Clone)]
pub struct HolidayFlattener {
    separator: String,
}

impl Default for HolidayFlattener {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl HolidayFlattener {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Flattens bullet lines until a depth-0 line or end of input.
    ///
    /// ```
    /// use onthisday_core::parse::HolidayFlattener;
    ///
    /// let lines = ["*Christian feast day:", "**Ampliatus", "**Begu", "*Labour Day"];
    /// let outcome = HolidayFlattener::default().flatten(lines);
    /// assert_eq!(
    ///     outcome.labels,
    ///     ["Christian feast day - Ampliatus", "Christian feast day - Begu", "Labour Day"]
    /// );
    /// ```
    pub fn flatten<'a, I>(&self, lines: I) -> FlattenOutcome
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut labels = Vec::new();
        let mut stack: Vec<String> = Vec::new();
        let mut consumed = 0;

        for line in lines {
            let depth = bullet_depth(line.trim_start());
            if depth == 0 {
                break;
            }
            consumed += 1;

            let label = clean_label(line);
            if depth > stack.len() + 1 {
                continue;
            }

            if depth > stack.len() {
                stack.push(label);
                continue;
            }

            self.emit(&stack, &mut labels);
            stack.truncate(depth);
            if let Some(top) = stack.last_mut() {
                *top = label;
            }
        }

        self.emit(&stack, &mut labels);

        FlattenOutcome { labels, consumed }
    }

    fn emit(&self, stack: &[String], labels: &mut Vec<String>) {
        let joined = stack
            .iter()
            .map(String::as_str)
            .filter(|label| !label.is_empty())
            .collect::<Vec<_>>()
            .join(&self.separator);
        if !joined.is_empty() {
            labels.push(joined);
        }
    }
}

/// Strips bullet markers, surrounding whitespace and a trailing colon.
fn clean_label(line: &str) -> String {
    line.trim()
        .trim_start_matches('*')
        .trim()
        .trim_end_matches(':')
        .trim_end()
        .to_string()
}
