use chrono::{NaiveDate, Timelike};
use chrono_tz::Tz;
use onthisday_core::calendar::assemble::ENTRY_TITLE;
use onthisday_core::db::open_db_in_memory;
use onthisday_core::{
    build_calendar, CalendarError, CalendarRequest, CalendarSink, CategorizedEvents, Category,
    CategoryCounts, EventEntry, EventMirror, EventRecord, EventRepository, IcsCalendarSink, Month,
    MonthDay, SqliteEventRepository, StalePolicy,
};

fn every_day_mirror() -> EventMirror {
    let records = MonthDay::all().flat_map(|date| {
        Category::ALL.into_iter().map(move |category| {
            EventRecord::new(
                date,
                category,
                match category {
                    Category::Holidays => EventEntry::undated(format!("Holiday of {date}")),
                    _ => EventEntry::new("1900", format!("{category} on {date}")),
                },
            )
        })
    });
    EventMirror::from_records(records)
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn one_year_from_leap_start_has_366_entries() {
    let mirror = every_day_mirror();
    let entries = build_calendar(&mirror, &CalendarRequest::one_year(ymd(2024, 1, 1))).unwrap();

    assert_eq!(entries.len(), 366);
    assert_eq!(entries[0].date, ymd(2024, 1, 1));
    assert_eq!(entries[365].date, ymd(2024, 12, 31));
    assert!(entries.windows(2).all(|pair| pair[0].date < pair[1].date));
    assert!(entries.iter().all(|entry| entry.title == ENTRY_TITLE));
}

#[test]
fn one_year_spanning_leap_day_has_366_entries() {
    let mirror = every_day_mirror();
    let entries = build_calendar(&mirror, &CalendarRequest::one_year(ymd(2023, 3, 1))).unwrap();
    assert_eq!(entries.len(), 366);
    assert_eq!(entries[365].date, ymd(2024, 2, 29));
}

#[test]
fn one_year_from_plain_start_has_365_entries() {
    let mirror = every_day_mirror();
    let entries = build_calendar(&mirror, &CalendarRequest::one_year(ymd(2025, 1, 1))).unwrap();
    assert_eq!(entries.len(), 365);
    assert_eq!(entries[364].date, ymd(2025, 12, 31));
}

#[test]
fn one_year_from_leap_day_ends_on_february_28() {
    let mirror = every_day_mirror();
    let entries = build_calendar(&mirror, &CalendarRequest::one_year(ymd(2024, 2, 29))).unwrap();
    assert_eq!(entries.len(), 366);
    assert_eq!(entries[0].date, ymd(2024, 2, 29));
    assert_eq!(entries[365].date, ymd(2025, 2, 28));
}

#[test]
fn default_body_lists_births_deaths_holidays() {
    let mirror = every_day_mirror();
    let mut request = CalendarRequest::one_year(ymd(2024, 2, 29));
    request.end = request.start;

    let entries = build_calendar(&mirror, &request).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].body,
        "Births\n1900: Births on February 29\n\n\
         Deaths\n1900: Deaths on February 29\n\n\
         Holidays and observances\nHoliday of February 29\n"
    );
}

#[test]
fn zero_and_unset_categories_are_omitted() {
    let mirror = every_day_mirror();
    let mut request = CalendarRequest::one_year(ymd(2024, 7, 4));
    request.end = ymd(2024, 7, 6);
    request.counts = CategoryCounts::new()
        .with(Category::Events, Some(1))
        .with(Category::Births, Some(0));

    let entries = build_calendar(&mirror, &request).unwrap();
    assert_eq!(entries.len(), 3);
    for entry in &entries {
        assert!(entry.body.starts_with("Events\n"));
        assert!(!entry.body.contains("Births"));
        assert!(!entry.body.contains("Deaths"));
        assert!(!entry.body.contains("Holidays and observances"));
    }
}

#[test]
fn empty_samples_drop_their_sub_heading() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::new(&conn);
    let mut events = CategorizedEvents::new();
    events.push(Category::Births, EventEntry::new("1847", "Alexander Graham Bell"));
    repo.store_scrape(
        MonthDay::new(Month::March, 3).unwrap(),
        1,
        &events,
        StalePolicy::Replace,
    )
    .unwrap();
    let mirror = EventMirror::load(&repo).unwrap();

    let mut request = CalendarRequest::one_year(ymd(2024, 3, 3));
    request.end = request.start;
    let entries = build_calendar(&mirror, &request).unwrap();
    assert_eq!(entries[0].body, "Births\n1847: Alexander Graham Bell\n");

    let from_store = build_calendar(&repo, &request).unwrap();
    assert_eq!(from_store[0].body, entries[0].body);
}

#[test]
fn entries_start_at_requested_local_time() {
    let mirror = every_day_mirror();
    let mut request = CalendarRequest::one_year(ymd(2024, 3, 30));
    request.end = ymd(2024, 4, 1);
    request.hour = 7;
    request.minute = 30;
    request.timezone = Tz::Europe__Dublin;

    let entries = build_calendar(&mirror, &request).unwrap();
    assert!(entries
        .iter()
        .all(|entry| entry.starts_at.hour() == 7 && entry.starts_at.minute() == 30));
    assert_eq!(entries[0].starts_at.timezone(), Tz::Europe__Dublin);
}

#[test]
fn invalid_range_and_time_are_rejected() {
    let mirror = every_day_mirror();
    let mut request = CalendarRequest::one_year(ymd(2024, 5, 2));
    request.end = ymd(2024, 5, 1);
    assert!(matches!(
        build_calendar(&mirror, &request),
        Err(CalendarError::InvalidRange { .. })
    ));

    let mut request = CalendarRequest::one_year(ymd(2024, 5, 1));
    request.hour = 24;
    assert!(matches!(
        build_calendar(&mirror, &request),
        Err(CalendarError::InvalidTime { hour: 24, .. })
    ));
}

#[test]
fn ics_output_has_one_event_per_day() {
    let mirror = every_day_mirror();
    let entries = build_calendar(&mirror, &CalendarRequest::one_year(ymd(2025, 1, 1))).unwrap();

    let ics = IcsCalendarSink::default().write(&entries).unwrap();
    assert!(ics.starts_with("BEGIN:VCALENDAR"));
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 365);
    assert!(ics.contains("DTSTART:20250101T090000Z"));
    assert!(ics.contains("DTSTART:20251231T090000Z"));
    assert!(!ics.contains("DTSTART:20260101"));
}
