//! Domain-wide constants shared by the parser, ingestor and reporting code.

/// Value stored for company or location when the listing does not carry one
pub const UNKNOWN_FIELD: &str = "N/A";

/// Inclusive bounds accepted by `trigger_ingestion`
pub const MIN_PAGES_PER_RUN: u32 = 1;
pub const MAX_PAGES_PER_RUN: u32 = 10;

/// Reporting limits for the grouped breakdowns
pub const COMPANY_BREAKDOWN_LIMIT: u32 = 20;
pub const LOCATION_BREAKDOWN_LIMIT: u32 = 15;
pub const RECENT_ACTIVITY_LIMIT: u32 = 10;

/// Window used by the dashboard "recent offers" counter
pub const RECENT_WINDOW_DAYS: i64 = 7;
