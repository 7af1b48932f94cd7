//! Per-date scrape workflow.
//!
//! # Responsibility
//! - Fetch, revision-check, parse and store one date's article.
//! - Run the bulk loop over many dates and report a per-date outcome.
//!
//! # Invariants
//! - An already-scraped revision or a parse failure performs zero writes.
//! - Events and the revision marker are written in one transaction.
//! - One failing date never aborts the bulk loop.

use crate::model::date::MonthDay;
use crate::model::event::RevisionId;
use crate::parse::{ParseError, SectionExtractor};
use crate::repo::event_repo::{EventRepository, RepoError, StalePolicy};
use crate::source::{PageSource, SourceError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Failure or skip signal for one date.
#[derive(Debug)]
pub enum ScrapeError {
    /// The fetched revision equals the stored marker. Not a failure.
    AlreadyScraped {
        page: String,
        revision_id: RevisionId,
    },
    Parse {
        page: String,
        source: ParseError,
    },
    Source(SourceError),
    Repo(RepoError),
}

impl Display for ScrapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyScraped { page, revision_id } => {
                write!(f, "revision {revision_id} of page {page} already stored")
            }
            Self::Parse { page, source } => write!(f, "error when parsing {page}: {source}"),
            Self::Source(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ScrapeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AlreadyScraped { .. } => None,
            Self::Parse { source, .. } => Some(source),
            Self::Source(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<SourceError> for ScrapeError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<RepoError> for ScrapeError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of one date in a bulk scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOutcome {
    Inserted(usize),
    AlreadyScraped,
    ParseFailed(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateReport {
    pub date: MonthDay,
    pub outcome: DateOutcome,
}

/// Aggregate counts over a bulk scrape, for reporting only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub dates_inserted: usize,
    pub events_inserted: usize,
    pub already_scraped: usize,
    pub parse_failures: usize,
    pub failures: usize,
}

impl ScrapeSummary {
    pub fn from_reports(reports: &[DateReport]) -> Self {
        reports
            .iter()
            .fold(Self::default(), |mut summary, report| {
                match &report.outcome {
                    DateOutcome::Inserted(count) => {
                        summary.dates_inserted += 1;
                        summary.events_inserted += count;
                    }
                    DateOutcome::AlreadyScraped => summary.already_scraped += 1,
                    DateOutcome::ParseFailed(_) => summary.parse_failures += 1,
                    DateOutcome::Failed(_) => summary.failures += 1,
                }
                summary
            })
    }
}

/// Scrape use-case service over a repository and a content source.
pub struct ScrapeService<R: EventRepository, S: PageSource> {
    repo: R,
    source: S,
    extractor: SectionExtractor,
    policy: StalePolicy,
}

impl<R: EventRepository, S: PageSource> ScrapeService<R, S> {
    pub fn new(repo: R, source: S) -> Self {
        Self {
            repo,
            source,
            extractor: SectionExtractor::default(),
            policy: StalePolicy::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: SectionExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetches and stores one date, returning the number of events inserted.
    ///
    /// # Errors
    /// - `AlreadyScraped` when the fetched revision equals the stored one.
    /// - `Parse` when the article structure is not recognized.
    /// - `Source`/`Repo` for transport and storage failures; the revision
    ///   marker is left untouched in every error case.
    pub fn scrape_date(&self, date: MonthDay) -> Result<usize, ScrapeError> {
        let started_at = Instant::now();
        let page = date.page_title();
        let last_revision = self.repo.get_revision(date)?;
        let fetched = self.source.fetch(&page)?;

        if last_revision == Some(fetched.revision_id) {
            info!(
                "event=scrape_date module=scrape status=skipped page={} revision={}",
                page, fetched.revision_id
            );
            return Err(ScrapeError::AlreadyScraped {
                page,
                revision_id: fetched.revision_id,
            });
        }

        let events = match self.extractor.extract(&fetched.plain_text) {
            Ok(events) => events,
            Err(source) => {
                warn!(
                    "event=scrape_date module=scrape status=parse_error page={} revision={} error={}",
                    page, fetched.revision_id, source
                );
                return Err(ScrapeError::Parse { page, source });
            }
        };

        let inserted = self
            .repo
            .store_scrape(date, fetched.revision_id, &events, self.policy)?;
        info!(
            "event=scrape_date module=scrape status=ok page={} revision={} inserted={} duration_ms={}",
            page,
            fetched.revision_id,
            inserted,
            started_at.elapsed().as_millis()
        );
        Ok(inserted)
    }

    /// Scrapes each date in order; every date gets a report.
    pub fn scrape_all(&self, dates: impl IntoIterator<Item = MonthDay>) -> Vec<DateReport> {
        let reports: Vec<DateReport> = dates
            .into_iter()
            .map(|date| DateReport {
                date,
                outcome: self.outcome_for(date),
            })
            .collect();

        let summary = ScrapeSummary::from_reports(&reports);
        info!(
            "event=scrape_all module=scrape status=done dates={} inserted_dates={} events={} skipped={} parse_failures={} failures={}",
            reports.len(),
            summary.dates_inserted,
            summary.events_inserted,
            summary.already_scraped,
            summary.parse_failures,
            summary.failures
        );
        reports
    }

    fn outcome_for(&self, date: MonthDay) -> DateOutcome {
        match self.scrape_date(date) {
            Ok(count) => DateOutcome::Inserted(count),
            Err(ScrapeError::AlreadyScraped { .. }) => DateOutcome::AlreadyScraped,
            Err(err @ ScrapeError::Parse { .. }) => DateOutcome::ParseFailed(err.to_string()),
            Err(err) => {
                error!(
                    "event=scrape_date module=scrape status=error page={} error={}",
                    date.page_title(),
                    err
                );
                DateOutcome::Failed(err.to_string())
            }
        }
    }
}
