//! Calendar assembly over a date range.

use crate::calendar::{CalendarError, CalendarResult};
use crate::model::date::MonthDay;
use crate::model::event::Category;
use crate::service::sampler::EventSampler;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use log::info;
use std::time::Instant;

/// Title of every generated daily entry.
pub const ENTRY_TITLE: &str = "On This Day";

pub const DEFAULT_HOUR: u32 = 9;
pub const DEFAULT_MINUTE: u32 = 0;

/// Requested number of events per category. `None` means unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: [Option<u32>; 4],
}

impl CategoryCounts {
    /// All categories unset.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: Category, count: Option<u32>) -> Self {
        self.set(category, count);
        self
    }

    pub fn set(&mut self, category: Category, count: Option<u32>) {
        self.counts[category.index()] = count;
    }

    pub fn get(&self, category: Category) -> Option<u32> {
        self.counts[category.index()]
    }

    pub fn is_unset(&self) -> bool {
        self.counts.iter().all(Option::is_none)
    }

    /// One each of births, deaths and holidays.
    pub fn default_selection() -> Self {
        Self::new()
            .with(Category::Births, Some(1))
            .with(Category::Deaths, Some(1))
            .with(Category::Holidays, Some(1))
    }

    /// Falls back to `default_selection` when nothing was requested.
    pub fn or_default_selection(self) -> Self {
        if self.is_unset() {
            Self::default_selection()
        } else {
            self
        }
    }

    /// Categories with a positive count, in display order.
    pub fn requested(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL
            .into_iter()
            .filter_map(|category| match self.get(category) {
                Some(count) if count > 0 => Some((category, count)),
                _ => None,
            })
    }
}

/// Parameters of one calendar build.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarRequest {
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
    pub hour: u32,
    pub minute: u32,
    pub timezone: Tz,
    pub counts: CategoryCounts,
}

impl CalendarRequest {
    /// One year starting at `start`, daily at 09:00 UTC, default categories.
    pub fn one_year(start: NaiveDate) -> Self {
        Self {
            start,
            end: one_year_end(start),
            hour: DEFAULT_HOUR,
            minute: DEFAULT_MINUTE,
            timezone: Tz::UTC,
            counts: CategoryCounts::default_selection(),
        }
    }

    /// Number of daily entries this request produces.
    pub fn day_count(&self) -> usize {
        if self.start > self.end {
            return 0;
        }
        (self.end - self.start).num_days() as usize + 1
    }
}

/// Last day of the one-year range beginning at `start`.
///
/// The anniversary of February 29 in a common year is March 1, so the range
/// ends on February 28.
pub fn one_year_end(start: NaiveDate) -> NaiveDate {
    let next_year = start.year() + 1;
    start
        .with_year(next_year)
        .or_else(|| NaiveDate::from_ymd_opt(next_year, 3, 1))
        .and_then(|anniversary| anniversary.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// One assembled day, ready for a calendar sink.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub starts_at: DateTime<Tz>,
    pub title: String,
    pub body: String,
}

/// Builds one entry per date of the request range, in date order.
pub fn build_calendar<S: EventSampler + ?Sized>(
    sampler: &S,
    request: &CalendarRequest,
) -> CalendarResult<Vec<DailyEntry>> {
    let started_at = Instant::now();
    if request.start > request.end {
        return Err(CalendarError::InvalidRange {
            start: request.start,
            end: request.end,
        });
    }
    let time = NaiveTime::from_hms_opt(request.hour, request.minute, 0).ok_or(
        CalendarError::InvalidTime {
            hour: request.hour,
            minute: request.minute,
        },
    )?;

    let mut entries = Vec::with_capacity(request.day_count());
    for date in request.start.iter_days().take_while(|date| *date <= request.end) {
        let starts_at = localize(request.timezone, date.and_time(time))
            .ok_or(CalendarError::NonexistentLocalTime { date })?;
        let body = assemble_body(sampler, MonthDay::from_date(date), &request.counts)?;
        entries.push(DailyEntry {
            date,
            starts_at,
            title: ENTRY_TITLE.to_string(),
            body,
        });
    }

    info!(
        "event=calendar_build module=calendar status=ok days={} start={} end={} duration_ms={}",
        entries.len(),
        request.start,
        request.end,
        started_at.elapsed().as_millis()
    );
    Ok(entries)
}

/// Sub-heading per category, one line per event, blank line after each block.
fn assemble_body<S: EventSampler + ?Sized>(
    sampler: &S,
    date: MonthDay,
    counts: &CategoryCounts,
) -> CalendarResult<String> {
    let mut lines = Vec::new();
    for (category, count) in counts.requested() {
        let events = sampler.sample(date, category, count)?;
        if events.is_empty() {
            continue;
        }
        lines.push(category.heading().to_string());
        lines.extend(events.iter().map(|event| event.format_line()));
        lines.push(String::new());
    }
    Ok(lines.join("\n"))
}

/// Resolves a local time, taking the earlier instant when ambiguous and
/// moving one hour forward when it falls in a DST gap.
fn localize(timezone: Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    timezone.from_local_datetime(&local).earliest().or_else(|| {
        timezone
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
    })
}
