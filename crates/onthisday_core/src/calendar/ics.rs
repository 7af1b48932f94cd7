//! Calendar sinks.

use crate::calendar::{CalendarResult, DailyEntry};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, Property};
use uuid::Uuid;

/// Product identifier written into generated `.ics` documents.
pub const DEFAULT_PROD_ID: &str = "-//OnThisDay//onthisday//EN";

/// Consumes ordered daily entries and produces a serialized document.
pub trait CalendarSink {
    type Output;

    fn write(&self, entries: &[DailyEntry]) -> CalendarResult<Self::Output>;
}

/// iCalendar serializer: one VEVENT per daily entry.
#[derive(Debug, Clone)]
pub struct IcsCalendarSink {
    prod_id: String,
}

impl Default for IcsCalendarSink {
    fn default() -> Self {
        Self::new(DEFAULT_PROD_ID)
    }
}

impl IcsCalendarSink {
    pub fn new(prod_id: impl Into<String>) -> Self {
        Self {
            prod_id: prod_id.into(),
        }
    }
}

impl CalendarSink for IcsCalendarSink {
    type Output = String;

    fn write(&self, entries: &[DailyEntry]) -> CalendarResult<String> {
        let mut cal = Calendar::new();

        for entry in entries {
            let mut event = icalendar::Event::new();
            event.uid(&Uuid::new_v4().to_string());
            event.summary(&entry.title);
            event.description(&entry.body);
            event.append_property(start_property(entry));
            cal.push(event.done());
        }

        let cal = cal.done();
        Ok(rewrite_prod_id(&cal.to_string(), &self.prod_id))
    }
}

/// DTSTART in UTC form for UTC entries, otherwise local time with TZID.
fn start_property(entry: &DailyEntry) -> Property {
    let timezone = entry.starts_at.timezone();
    if timezone == Tz::UTC {
        let utc = entry.starts_at.naive_utc();
        return Property::new("DTSTART", utc.format("%Y%m%dT%H%M%SZ").to_string());
    }

    let local = entry.starts_at.naive_local();
    let mut prop = Property::new("DTSTART", local.format("%Y%m%dT%H%M%S").to_string());
    prop.add_parameter("TZID", timezone.name());
    prop
}

fn rewrite_prod_id(ics: &str, prod_id: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(prod_id);
        } else {
            result.push_str(line);
        }
        result.push_str("\r\n");
    }
    result
}
