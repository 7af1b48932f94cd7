use crate::source::MediaWikiSource;
use anyhow::{bail, Result};
use onthisday_core::{
    validate_criteria, DateOutcome, MonthDay, OnThisDayConfig, RawCriteria, ScrapeService,
    ScrapeSummary, SectionExtractor, SqliteEventRepository,
};
use rusqlite::Connection;

pub fn run(
    conn: &Connection,
    config: &OnThisDayConfig,
    month: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let dates = select_dates(month, date)?;
    let source = MediaWikiSource::new(&config.api_url, &config.user_agent)?;
    let service = ScrapeService::new(SqliteEventRepository::new(conn), source)
        .with_extractor(SectionExtractor::with_separator(
            config.holiday_separator.clone(),
        ))
        .with_stale_policy(config.stale_policy);

    let reports = service.scrape_all(dates);
    for report in &reports {
        match &report.outcome {
            DateOutcome::ParseFailed(message) | DateOutcome::Failed(message) => {
                eprintln!("{}: {message}", report.date.page_title());
            }
            DateOutcome::Inserted(_) | DateOutcome::AlreadyScraped => {}
        }
    }

    let summary = ScrapeSummary::from_reports(&reports);
    println!(
        "Inserted {} events for {} dates ({} already up to date, {} parse failures, {} other failures).",
        summary.events_inserted,
        summary.dates_inserted,
        summary.already_scraped,
        summary.parse_failures,
        summary.failures
    );
    Ok(())
}

/// Canonical dates matching the optional month and day filters.
fn select_dates(month: Option<&str>, date: Option<&str>) -> Result<Vec<MonthDay>> {
    let criteria = validate_criteria(&RawCriteria {
        month: month.map(str::to_string),
        date: date.map(str::to_string),
        category: None,
    })?;

    let dates: Vec<MonthDay> = MonthDay::all()
        .filter(|day| criteria.month.map_or(true, |month| day.month() == month))
        .filter(|day| criteria.date.map_or(true, |date| day.day() == date))
        .collect();
    if dates.is_empty() {
        bail!("No dates match the given month and date");
    }
    Ok(dates)
}
