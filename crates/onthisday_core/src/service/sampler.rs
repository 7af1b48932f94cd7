//! Sampling seam shared by the mirror and the SQLite store.
//!
//! The two implementations differ on short slots: the mirror returns nothing
//! when fewer events exist than requested, the store returns what it has.

use crate::model::criteria::{validate_count, EventCriteria};
use crate::model::date::MonthDay;
use crate::model::event::{Category, EventEntry};
use crate::repo::event_repo::{EventRepository, RepoResult, SqliteEventRepository};
use crate::service::mirror::EventMirror;

/// Source of random events for one date and category.
pub trait EventSampler {
    fn sample(&self, date: MonthDay, category: Category, count: u32)
        -> RepoResult<Vec<EventEntry>>;
}

impl EventSampler for EventMirror {
    fn sample(
        &self,
        date: MonthDay,
        category: Category,
        count: u32,
    ) -> RepoResult<Vec<EventEntry>> {
        Ok(self.get_random_events(date.month(), date.day(), category, count)?)
    }
}

impl EventSampler for SqliteEventRepository<'_> {
    fn sample(
        &self,
        date: MonthDay,
        category: Category,
        count: u32,
    ) -> RepoResult<Vec<EventEntry>> {
        validate_count(i64::from(count))?;
        let criteria = EventCriteria::new(Some(date.month()), Some(date.day()), Some(category))?;
        let records = self.random_events(&criteria, count)?;
        Ok(records.into_iter().map(|record| record.into_entry()).collect())
    }
}

impl<T: EventSampler + ?Sized> EventSampler for &T {
    fn sample(
        &self,
        date: MonthDay,
        category: Category,
        count: u32,
    ) -> RepoResult<Vec<EventEntry>> {
        (**self).sample(date, category, count)
    }
}
