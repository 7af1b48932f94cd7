//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate fetch → parse → store for per-date articles.
//! - Provide the in-memory mirror and the sampling seam used by calendars.

pub mod mirror;
pub mod sampler;
pub mod scrape_service;
