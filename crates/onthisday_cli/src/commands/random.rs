use super::FilterArgs;
use anyhow::Result;
use onthisday_core::{EventRecord, EventRepository, SqliteEventRepository};
use rusqlite::Connection;

pub fn run(conn: &Connection, filter: &FilterArgs, count: u32, json: bool) -> Result<()> {
    let criteria = filter.criteria()?;
    let records = SqliteEventRepository::new(conn).random_events(&criteria, count)?;
    print_records(&records, json)
}

pub fn run_all(conn: &Connection, filter: &FilterArgs, json: bool) -> Result<()> {
    let criteria = filter.criteria()?;
    let records = SqliteEventRepository::new(conn).all_events(&criteria)?;
    print_records(&records, json)
}

fn print_records(records: &[EventRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    for record in records {
        println!("{}", format_record(record));
    }
    Ok(())
}

/// `(14 February) 1876 - description`, without the year when undated.
fn format_record(record: &EventRecord) -> String {
    if record.year.is_empty() {
        format!("({} {}) {}", record.day, record.month, record.description)
    } else {
        format!(
            "({} {}) {} - {}",
            record.day, record.month, record.year, record.description
        )
    }
}
