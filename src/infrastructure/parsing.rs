//! HTML parsing infrastructure for job listing pages
//!
//! Selectors are configured as CSS strings and compiled once. A fragment
//! missing a mandatory field is skipped and never fails the page.

pub mod config;
pub mod error;
pub mod job_list_parser;

// Re-export public types
pub use config::{CompiledSelectors, ListingSelectors};
pub use error::{ParsingError, ParsingResult};
pub use job_list_parser::{JobListParser, PageExtraction};
