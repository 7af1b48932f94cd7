use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use clap::Args;
use onthisday_core::calendar::assemble::one_year_end;
use onthisday_core::{
    build_calendar, CalendarRequest, CalendarSink, Category, CategoryCounts, DailyEntry,
    EventMirror, IcsCalendarSink, SqliteEventRepository,
};
use rusqlite::Connection;
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct CalendarArgs {
    /// Time of the daily entry
    #[arg(long, value_name = "HH:MM", default_value = "09:00")]
    time: String,

    /// First day of the calendar (default: today)
    #[arg(long, value_name = "YYYYMMDD")]
    start: Option<String>,

    /// Last day of the calendar (default: the day before the start date a year later)
    #[arg(long, value_name = "YYYYMMDD")]
    end: Option<String>,

    /// Number of births per day
    #[arg(long, value_name = "N")]
    birth: Option<u32>,

    /// Number of deaths per day
    #[arg(long, value_name = "N")]
    death: Option<u32>,

    /// Number of events per day
    #[arg(long, value_name = "N")]
    event: Option<u32>,

    /// Number of holidays and observances per day
    #[arg(long, value_name = "N")]
    holiday: Option<u32>,

    /// IANA timezone of the daily entry (e.g. "Europe/London")
    #[arg(long, default_value = "UTC")]
    tz: String,

    /// Write the calendar here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Sample with SQL queries instead of loading everything into memory
    #[arg(long)]
    from_store: bool,
}

pub fn run(conn: &Connection, args: &CalendarArgs) -> Result<()> {
    let request = request_from_args(args, Local::now().date_naive())?;
    let repo = SqliteEventRepository::new(conn);

    let entries: Vec<DailyEntry> = if args.from_store {
        build_calendar(&repo, &request)?
    } else {
        let mirror = EventMirror::load(&repo)?;
        build_calendar(&mirror, &request)?
    };
    let ics = IcsCalendarSink::default().write(&entries)?;

    match &args.output {
        Some(path) => std::fs::write(path, ics)
            .with_context(|| format!("Failed to write calendar to {}", path.display()))?,
        None => print!("{ics}"),
    }
    Ok(())
}

fn request_from_args(args: &CalendarArgs, today: NaiveDate) -> Result<CalendarRequest> {
    let time = parse_time(&args.time)?;
    let start = args.start.as_deref().map(parse_date).transpose()?.unwrap_or(today);
    let end = match args.end.as_deref() {
        Some(value) => parse_date(value)?,
        None => one_year_end(start),
    };
    let timezone: Tz = args
        .tz
        .parse()
        .map_err(|_| anyhow!("Unknown timezone '{}'", args.tz))?;

    let counts = CategoryCounts::new()
        .with(Category::Births, args.birth)
        .with(Category::Deaths, args.death)
        .with(Category::Events, args.event)
        .with(Category::Holidays, args.holiday)
        .or_default_selection();

    Ok(CalendarRequest {
        start,
        end,
        hour: time.hour(),
        minute: time.minute(),
        timezone,
        counts,
    })
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .with_context(|| format!("Invalid time '{value}', expected HH:MM"))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y%m%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYYMMDD"))
}
