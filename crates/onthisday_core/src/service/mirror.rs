//! In-memory, read-only mirror of the event store.
//!
//! # Responsibility
//! - Bulk-load every stored event once.
//! - Sample events for one `(month, day, category)` without touching SQLite.
//!
//! # Invariants
//! - Immutable after construction; rebuild wholesale to pick up new rows.
//! - Sampling is without replacement; when fewer events exist than requested
//!   the result is empty.

use crate::model::criteria::{validate_count, EventCriteria, ValidationError};
use crate::model::date::{Month, MonthDay, DAYS_IN_CANONICAL_YEAR};
use crate::model::event::{Category, EventEntry, EventRecord};
use crate::repo::event_repo::{EventRepository, RepoResult};
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;

const CATEGORY_COUNT: usize = Category::ALL.len();
const SLOT_COUNT: usize = DAYS_IN_CANONICAL_YEAR * CATEGORY_COUNT;

/// Arena of event lists, one slot per `(date, category)`.
#[derive(Debug, Clone)]
pub struct EventMirror {
    slots: Vec<Vec<EventEntry>>,
    total: usize,
}

impl Default for EventMirror {
    fn default() -> Self {
        Self {
            slots: vec![Vec::new(); SLOT_COUNT],
            total: 0,
        }
    }
}

impl EventMirror {
    /// Loads every stored event with one full scan.
    pub fn load<R: EventRepository + ?Sized>(repo: &R) -> RepoResult<Self> {
        let started_at = Instant::now();
        let records = repo.all_events(&EventCriteria::any())?;
        let mirror = Self::from_records(records);
        info!(
            "event=mirror_load module=mirror status=ok events={} duration_ms={}",
            mirror.len(),
            started_at.elapsed().as_millis()
        );
        Ok(mirror)
    }

    /// Builds a mirror from records, keeping their order within each slot.
    pub fn from_records(records: impl IntoIterator<Item = EventRecord>) -> Self {
        let mut mirror = Self::default();
        for record in records {
            let Ok(date) = MonthDay::new(record.month, record.day) else {
                continue;
            };
            let slot = slot_index(date, record.category);
            mirror.slots[slot].push(record.into_entry());
            mirror.total += 1;
        }
        mirror
    }

    /// Total events held.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Events for one date and category, in store order.
    pub fn events(&self, date: MonthDay, category: Category) -> &[EventEntry] {
        &self.slots[slot_index(date, category)]
    }

    /// Draws `count` distinct events using the thread-local RNG.
    pub fn get_random_events(
        &self,
        month: Month,
        date: u32,
        category: Category,
        count: u32,
    ) -> Result<Vec<EventEntry>, ValidationError> {
        self.get_random_events_with(&mut rand::thread_rng(), month, date, category, count)
    }

    /// Draws `count` distinct events using `rng`.
    ///
    /// Returns an empty list when the slot holds fewer than `count` events.
    pub fn get_random_events_with<G: Rng + ?Sized>(
        &self,
        rng: &mut G,
        month: Month,
        date: u32,
        category: Category,
        count: u32,
    ) -> Result<Vec<EventEntry>, ValidationError> {
        let count = validate_count(i64::from(count))? as usize;
        let date = MonthDay::new(month, date)?;
        let events = self.events(date, category);
        if events.len() < count {
            return Ok(Vec::new());
        }
        Ok(events.choose_multiple(rng, count).cloned().collect())
    }
}

fn slot_index(date: MonthDay, category: Category) -> usize {
    date.ordinal() * CATEGORY_COUNT + category.index()
}

#[cfg(test)]
mod tests {
    use super::EventMirror;
    use crate::model::date::{Month, MonthDay};
    use crate::model::event::{Category, EventEntry, EventRecord};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn record(month: Month, day: u32, category: Category, year: &str, text: &str) -> EventRecord {
        EventRecord::new(
            MonthDay::new(month, day).unwrap(),
            category,
            EventEntry::new(year, text),
        )
    }

    fn sample_mirror() -> EventMirror {
        let mut records: Vec<EventRecord> = (0..10)
            .map(|i| {
                record(
                    Month::March,
                    3,
                    Category::Births,
                    &format!("19{i:02}"),
                    &format!("Person {i}"),
                )
            })
            .collect();
        records.push(record(Month::March, 3, Category::Deaths, "1700", "Only one"));
        records.push(record(Month::February, 29, Category::Events, "2000", "Leap"));
        EventMirror::from_records(records)
    }

    #[test]
    fn from_records_buckets_by_date_and_category() {
        let mirror = sample_mirror();
        assert_eq!(mirror.len(), 12);
        let march_3 = MonthDay::new(Month::March, 3).unwrap();
        assert_eq!(mirror.events(march_3, Category::Births).len(), 10);
        assert_eq!(mirror.events(march_3, Category::Births)[0].year, "1900");
        assert_eq!(mirror.events(march_3, Category::Deaths).len(), 1);
        let leap = MonthDay::new(Month::February, 29).unwrap();
        assert_eq!(mirror.events(leap, Category::Events)[0].description, "Leap");
    }

    #[test]
    fn sampling_is_without_replacement() {
        let mirror = sample_mirror();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let sample = mirror
                .get_random_events_with(&mut rng, Month::March, 3, Category::Births, 10)
                .unwrap();
            assert_eq!(sample.len(), 10);
            let distinct: HashSet<&EventEntry> = sample.iter().collect();
            assert_eq!(distinct.len(), 10);
        }
    }

    #[test]
    fn too_few_events_yields_empty_result() {
        let mirror = sample_mirror();
        let sample = mirror
            .get_random_events(Month::March, 3, Category::Deaths, 2)
            .unwrap();
        assert!(sample.is_empty());
        let sample = mirror
            .get_random_events(Month::March, 4, Category::Deaths, 1)
            .unwrap();
        assert!(sample.is_empty());
    }

    #[test]
    fn invalid_input_is_rejected() {
        let mirror = sample_mirror();
        assert!(mirror
            .get_random_events(Month::February, 30, Category::Births, 1)
            .is_err());
        assert!(mirror
            .get_random_events(Month::March, 3, Category::Births, 0)
            .is_err());
    }
}
