//! Domain model for scraped "on this day" events.
//!
//! # Responsibility
//! - Define canonical calendar keys (`Month`, `MonthDay`) and event shapes.
//! - Own the validation rules shared by the store and the mirror.
//!
//! # Invariants
//! - A `MonthDay` never exceeds the canonical day count of its month.
//! - February is fixed at 29 days so leap dates have a canonical key.

pub mod criteria;
pub mod date;
pub mod event;
