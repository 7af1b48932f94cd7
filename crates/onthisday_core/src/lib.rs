//! Core domain logic for OnThisDay.
//! Scraping, storage, sampling and calendar generation live here; binaries
//! only wire inputs and transports.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod parse;
pub mod repo;
pub mod service;
pub mod source;

pub use calendar::{
    build_calendar, CalendarError, CalendarRequest, CalendarResult, CalendarSink,
    CategoryCounts, DailyEntry, IcsCalendarSink,
};
pub use config::OnThisDayConfig;
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LoggingOptions,
};
pub use model::criteria::{
    parse_count, validate_count, validate_criteria, EventCriteria, RawCriteria, ValidationError,
};
pub use model::date::{Month, MonthDay};
pub use model::event::{CategorizedEvents, Category, EventEntry, EventRecord, RevisionId};
pub use parse::{extract_events, plain_text, ParseError, SectionExtractor};
pub use repo::event_repo::{
    EventRepository, RepoError, RepoResult, SqliteEventRepository, StalePolicy,
};
pub use service::mirror::EventMirror;
pub use service::sampler::EventSampler;
pub use service::scrape_service::{
    DateOutcome, DateReport, ScrapeError, ScrapeService, ScrapeSummary,
};
pub use source::{FetchedPage, PageSource, SourceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
