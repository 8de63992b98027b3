//! Job Market Scraper - listing ingestion and technology demand analysis
//!
//! Pages of a job board are fetched sequentially, listing cards are parsed
//! into typed offers, deduplicated by canonical URL and stored per page in
//! SQLite. Stored descriptions are ranked against a technology vocabulary.

pub mod application;
pub mod domain;
pub mod infrastructure;
