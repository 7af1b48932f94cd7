//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the event store contract used by scraping and sampling.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository reads validate criteria and return `RepoError::Validation`
//!   for malformed input before touching the database.

pub mod event_repo;
