//! Event repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist scraped events and the per-date revision marker.
//! - Serve filtered enumeration and random sampling queries.
//!
//! # Invariants
//! - A revision marker is only written together with its events, inside one
//!   transaction (`store_scrape`).
//! - Read paths reject invalid persisted state instead of masking it.
//! - Criteria are validated before any SQL runs.

use crate::db::DbError;
use crate::model::criteria::{validate_count, EventCriteria, ValidationError};
use crate::model::date::{validate_day, Month, MonthDay};
use crate::model::event::{CategorizedEvents, Category, EventRecord, RevisionId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EVENT_SELECT_SQL: &str = "SELECT
    month,
    date,
    event_category,
    year,
    description
FROM events";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for event persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// What happens to a date's existing rows when a newer revision is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Delete the date's rows before inserting the new revision's events.
    #[default]
    Replace,
    /// Keep old rows; the store only grows.
    Append,
}

/// Repository interface for the event store.
pub trait EventRepository {
    fn get_revision(&self, date: MonthDay) -> RepoResult<Option<RevisionId>>;
    /// Appends every event as a new row; never deduplicates.
    fn insert_events(
        &self,
        date: MonthDay,
        revision_id: RevisionId,
        events: &CategorizedEvents,
    ) -> RepoResult<usize>;
    fn set_revision(&self, date: MonthDay, revision_id: RevisionId) -> RepoResult<()>;
    fn clear_events(&self, date: MonthDay) -> RepoResult<usize>;
    /// Writes one date's events and revision marker atomically and commits.
    fn store_scrape(
        &self,
        date: MonthDay,
        revision_id: RevisionId,
        events: &CategorizedEvents,
        policy: StalePolicy,
    ) -> RepoResult<usize>;
    /// Up to `count` random matching rows; fewer when fewer match.
    fn random_events(&self, criteria: &EventCriteria, count: u32)
        -> RepoResult<Vec<EventRecord>>;
    /// All matching rows in insertion order.
    fn all_events(&self, criteria: &EventCriteria) -> RepoResult<Vec<EventRecord>>;
    fn count_events(&self, criteria: &EventCriteria) -> RepoResult<u64>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn get_revision(&self, date: MonthDay) -> RepoResult<Option<RevisionId>> {
        let revision = self
            .conn
            .query_row(
                "SELECT rev_id FROM revisions WHERE month = ?1 AND date = ?2;",
                params![date.month().name(), date.day()],
                |row| row.get::<_, RevisionId>(0),
            )
            .optional()?;
        Ok(revision)
    }

    fn insert_events(
        &self,
        date: MonthDay,
        revision_id: RevisionId,
        events: &CategorizedEvents,
    ) -> RepoResult<usize> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO events (
                month,
                date,
                rev_id,
                event_category,
                year,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        )?;

        let mut inserted = 0;
        for (category, entry) in events.iter() {
            inserted += stmt.execute(params![
                date.month().name(),
                date.day(),
                revision_id,
                category.heading(),
                entry.year.as_str(),
                entry.description.as_str(),
            ])?;
        }
        Ok(inserted)
    }

    fn set_revision(&self, date: MonthDay, revision_id: RevisionId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO revisions (month, date, rev_id) VALUES (?1, ?2, ?3)
             ON CONFLICT (month, date) DO UPDATE SET
                rev_id = excluded.rev_id,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![date.month().name(), date.day(), revision_id],
        )?;
        Ok(())
    }

    fn clear_events(&self, date: MonthDay) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM events WHERE month = ?1 AND date = ?2;",
            params![date.month().name(), date.day()],
        )?;
        Ok(removed)
    }

    fn store_scrape(
        &self,
        date: MonthDay,
        revision_id: RevisionId,
        events: &CategorizedEvents,
        policy: StalePolicy,
    ) -> RepoResult<usize> {
        // Dropping `tx` on any early return rolls the whole date back.
        let tx = self.conn.unchecked_transaction()?;
        let scoped = SqliteEventRepository::new(&tx);
        if policy == StalePolicy::Replace {
            scoped.clear_events(date)?;
        }
        let inserted = scoped.insert_events(date, revision_id, events)?;
        scoped.set_revision(date, revision_id)?;
        tx.commit()?;
        Ok(inserted)
    }

    fn random_events(
        &self,
        criteria: &EventCriteria,
        count: u32,
    ) -> RepoResult<Vec<EventRecord>> {
        validate_count(i64::from(count))?;
        let criteria = revalidate(criteria)?;

        let (filter, mut bind_values) = where_clause(&criteria);
        let sql = format!("{EVENT_SELECT_SQL}{filter} ORDER BY RANDOM() LIMIT ?");
        bind_values.push(Value::Integer(i64::from(count)));
        self.query_records(&sql, bind_values)
    }

    fn all_events(&self, criteria: &EventCriteria) -> RepoResult<Vec<EventRecord>> {
        let criteria = revalidate(criteria)?;
        let (filter, bind_values) = where_clause(&criteria);
        let sql = format!("{EVENT_SELECT_SQL}{filter} ORDER BY id ASC");
        self.query_records(&sql, bind_values)
    }

    fn count_events(&self, criteria: &EventCriteria) -> RepoResult<u64> {
        let criteria = revalidate(criteria)?;
        let (filter, bind_values) = where_clause(&criteria);
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM events{filter}"),
            params_from_iter(bind_values),
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count.max(0) as u64)
    }
}

impl SqliteEventRepository<'_> {
    fn query_records(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<EventRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_event_row(row)?);
        }

        Ok(records)
    }
}

/// Criteria may be built field-by-field; re-check the date against the month.
fn revalidate(criteria: &EventCriteria) -> Result<EventCriteria, ValidationError> {
    EventCriteria::new(criteria.month, criteria.date, criteria.category)
}

fn where_clause(criteria: &EventCriteria) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1 = 1");
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(month) = criteria.month {
        sql.push_str(" AND month = ?");
        bind_values.push(Value::Text(month.name().to_string()));
    }
    if let Some(date) = criteria.date {
        sql.push_str(" AND date = ?");
        bind_values.push(Value::Integer(i64::from(date)));
    }
    if let Some(category) = criteria.category {
        sql.push_str(" AND event_category = ?");
        bind_values.push(Value::Text(category.heading().to_string()));
    }

    (sql, bind_values)
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<EventRecord> {
    let month_text: String = row.get("month")?;
    let month = Month::parse(&month_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid month `{month_text}` in events.month"))
    })?;

    let date_value: i64 = row.get("date")?;
    let day = validate_day(Some(month), date_value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_value}` for {month} in events.date"
        ))
    })?;

    let category_text: String = row.get("event_category")?;
    let category = Category::from_heading(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in events.event_category"
        ))
    })?;

    Ok(EventRecord {
        month,
        day,
        category,
        year: row.get("year")?,
        description: row.get("description")?,
    })
}

#[cfg(test)]
mod tests {
    use super::where_clause;
    use crate::model::criteria::EventCriteria;
    use crate::model::date::Month;
    use crate::model::event::Category;

    #[test]
    fn where_clause_binds_only_given_fields() {
        let (sql, binds) = where_clause(&EventCriteria::any());
        assert_eq!(sql, " WHERE 1 = 1");
        assert!(binds.is_empty());

        let criteria =
            EventCriteria::new(Some(Month::May), Some(4), Some(Category::Deaths)).unwrap();
        let (sql, binds) = where_clause(&criteria);
        assert_eq!(
            sql,
            " WHERE 1 = 1 AND month = ? AND date = ? AND event_category = ?"
        );
        assert_eq!(binds.len(), 3);
    }
}
