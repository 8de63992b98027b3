//! Infrastructure layer for configuration, HTTP fetching, HTML parsing and
//! SQLite persistence

pub mod config;
pub mod database_connection;
pub mod job_offer_repository;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod simple_http_client;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError};
pub use database_connection::DatabaseConnection;
pub use job_offer_repository::SqliteJobOfferRepository;
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{JobListParser, ListingSelectors, PageExtraction, ParsingError, ParsingResult};
pub use simple_http_client::{FetchError, HttpClient, HttpClientConfig, PageFetcher};
