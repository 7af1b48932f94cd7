//! Upstream content source seam.
//!
//! Implementations fetch one per-date article and return its revision id with
//! the plain-text body. Network concerns (HTTP client, politeness, retries)
//! live entirely in the implementation.

use crate::model::event::RevisionId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One fetched article revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub revision_id: RevisionId,
    /// Plain text, headings as `==Name==` and list items as `*` lines.
    pub plain_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The request could not be completed.
    Transport(String),
    /// The source has no page with this id.
    MissingPage(String),
    /// The response did not have the expected shape.
    InvalidResponse(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "content source request failed: {message}"),
            Self::MissingPage(page_id) => write!(f, "page not found: {page_id}"),
            Self::InvalidResponse(message) => {
                write!(f, "unexpected content source response: {message}")
            }
        }
    }
}

impl Error for SourceError {}

/// Fetches articles by page id (e.g. `February_29`).
pub trait PageSource {
    fn fetch(&self, page_id: &str) -> Result<FetchedPage, SourceError>;
}

impl<T: PageSource + ?Sized> PageSource for &T {
    fn fetch(&self, page_id: &str) -> Result<FetchedPage, SourceError> {
        (**self).fetch(page_id)
    }
}
