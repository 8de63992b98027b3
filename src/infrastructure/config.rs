//! Configuration infrastructure
//!
//! Contains configuration loading for the job-listing scraper.
//!
//! Configuration is layered, lowest precedence first:
//! 1. Built-in defaults (see [`defaults`] and [`computrabajo`])
//! 2. Optional config file (format picked from the extension)
//! 3. Environment variables prefixed with `JOB_MARKET__`
//!
//! The resulting [`AppConfig`] is immutable and is handed explicitly to the
//! ingestor and analyzer constructors.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::infrastructure::parsing::config::ListingSelectors;

/// Environment variable prefix, e.g. `JOB_MARKET__SCRAPER__PAGE_DELAY_MS=0`
pub const ENV_PREFIX: &str = "JOB_MARKET";

/// Placeholder replaced by the page index in [`ScraperConfig::page_url_template`]
pub const PAGE_PLACEHOLDER: &str = "{page}";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub selectors: ListingSelectors,
    pub analyzer: AnalyzerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Fetching and page-loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Listing page URL containing the `{page}` placeholder
    pub page_url_template: String,

    /// Origin prepended to relative hrefs to form canonical URLs
    pub site_origin: String,

    /// Source label stored on every offer
    pub source_label: String,

    /// Browser-identifying user agent sent with every request
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Politeness delay between pages in milliseconds
    pub page_delay_ms: u64,
}

/// Technology demand analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Vocabulary searched in descriptions, in tie-break order
    pub technologies: Vec<String>,
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite:/path/to/job_market.db`
    pub url: String,

    /// Maximum pooled connections
    pub max_connections: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output (stderr, stdout carries command output)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files; platform data directory when unset
    pub log_dir: Option<PathBuf>,

    /// Log file name inside `log_dir`
    pub file_name: String,
}

impl ScraperConfig {
    /// Build the listing URL for a 1-based page index
    pub fn page_url(&self, page: u32) -> String {
        self.page_url_template
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub const fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            page_url_template: computrabajo::PAGE_URL_TEMPLATE.to_string(),
            site_origin: computrabajo::SITE_ORIGIN.to_string(),
            source_label: computrabajo::SOURCE_LABEL.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            page_delay_ms: defaults::PAGE_DELAY_MS,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            technologies: defaults::TECHNOLOGIES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let path = AppConfig::get_app_data_dir().map_or_else(
            || PathBuf::from(defaults::DATABASE_FILE),
            |dir| dir.join(defaults::DATABASE_FILE),
        );
        Self {
            url: format!("sqlite:{}", path.display()),
            max_connections: defaults::DATABASE_MAX_CONNECTIONS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Application data directory (database, logs)
    pub fn get_app_data_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join(defaults::APP_DIR_NAME))
    }

    /// Default config file location, only used when it exists
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(defaults::APP_DIR_NAME).join(defaults::CONFIG_FILE))
    }

    /// Load configuration from defaults, an optional file and the environment
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = config::Config::try_from(&Self::default())?;
        let mut builder = config::Config::builder().add_source(defaults);

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path));
            }
            None => {
                if let Some(default_path) = Self::get_config_path() {
                    builder = builder.add_source(config::File::from(default_path).required(false));
                }
            }
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("analyzer.technologies"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        info!("Loaded configuration (source: {})", config.scraper.source_label);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scraper.page_url_template.contains(PAGE_PLACEHOLDER) {
            return Err(ConfigError::Validation {
                message: format!(
                    "scraper.page_url_template must contain '{PAGE_PLACEHOLDER}'"
                ),
            });
        }

        match Url::parse(&self.scraper.site_origin) {
            Ok(origin) if matches!(origin.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::Validation {
                    message: format!(
                        "scraper.site_origin must be an absolute http(s) URL, got '{}'",
                        self.scraper.site_origin
                    ),
                });
            }
        }

        if self.scraper.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "scraper.request_timeout_seconds must be greater than 0".to_string(),
            });
        }

        if self.analyzer.technologies.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation {
                message: "analyzer.technologies must not be empty".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation {
                message: "database.max_connections must be greater than 0".to_string(),
            });
        }

        self.selectors.compile().map_err(|e| ConfigError::Validation {
            message: e.to_string(),
        })?;

        Ok(())
    }
}

/// Computrabajo site constants
pub mod computrabajo {
    /// Origin used to build canonical offer URLs
    pub const SITE_ORIGIN: &str = "https://www.computrabajo.com.co";

    /// Python developer search, paginated with `p`
    pub const PAGE_URL_TEMPLATE: &str =
        "https://www.computrabajo.com.co/ofertas-de-trabajo/?q=python&p={page}";

    pub const SOURCE_LABEL: &str = "Computrabajo";
}

/// Default configuration values
pub mod defaults {
    pub const APP_DIR_NAME: &str = "job-market-scraper";
    pub const CONFIG_FILE: &str = "config.toml";

    pub const USER_AGENT: &str = concat!(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 ",
        "(KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
    );

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 15;

    /// Default delay between pages in milliseconds
    pub const PAGE_DELAY_MS: u64 = 1000;

    pub const DATABASE_FILE: &str = "job_market.db";
    pub const DATABASE_MAX_CONNECTIONS: u32 = 5;

    // Log configuration defaults
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "job-market.log";

    /// Technologies searched in offer descriptions
    pub const TECHNOLOGIES: &[&str] = &[
        "Python", "Java", "JavaScript", "TypeScript", "C#", "C++", "PHP", "Ruby", "Go", "Swift",
        "Kotlin", "React", "Angular", "Vue.js", "Node.js", "Django", "Flask", "Spring", "ASP.NET",
        "SQL", "PostgreSQL", "MySQL", "MongoDB", "Redis", "AWS", "Azure", "Google Cloud", "GCP",
        "Docker", "Kubernetes", "Git", "Jenkins", "Terraform",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analyzer.technologies.len(), 33);
        assert_eq!(config.scraper.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn page_url_substitutes_index() {
        let config = ScraperConfig::default();
        assert_eq!(
            config.page_url(3),
            "https://www.computrabajo.com.co/ofertas-de-trabajo/?q=python&p=3"
        );
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let mut config = AppConfig::default();
        config.scraper.page_url_template = "https://example.com/jobs".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn relative_origin_is_rejected() {
        let mut config = AppConfig::default();
        config.scraper.site_origin = "/jobs".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn empty_vocabulary_is_rejected() {
        let mut config = AppConfig::default();
        config.analyzer.technologies.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_overrides_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[scraper]
page_delay_ms = 0
source_label = "TestSite"

[analyzer]
technologies = ["Rust", "Go"]
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.scraper.page_delay_ms, 0);
        assert_eq!(config.scraper.source_label, "TestSite");
        assert_eq!(config.analyzer.technologies, vec!["Rust", "Go"]);
        // untouched sections keep their defaults
        assert_eq!(config.scraper.site_origin, computrabajo::SITE_ORIGIN);
    }

    #[test]
    fn explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::Load { .. })));
    }
}
