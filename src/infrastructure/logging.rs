//! Logging system configuration and initialization
//!
//! Console output goes to stderr so command results on stdout stay
//! machine-readable. File output is optional and can be plain or JSON.
//! `RUST_LOG` overrides the configured filter when set.

use anyhow::{Result, anyhow};
use chrono::Utc;
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{Subscriber, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;
use crate::infrastructure::config::AppConfig;

// Global guard to keep the log file writer alive
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<tracing_appender::non_blocking::WorkerGuard>> =
        Mutex::new(Vec::new());
}

/// UTC timestamps with millisecond precision
struct UtcTimeFormatter;

impl FormatTime for UtcTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

/// Console layer on stderr, generic so it can sit on any layer stack
fn console_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_timer(UtcTimeFormatter)
        .with_target(false)
}

/// Directory that receives log files
pub fn get_log_directory(config: &LoggingConfig) -> PathBuf {
    config.log_dir.clone().unwrap_or_else(|| {
        AppConfig::get_app_data_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default()
            .join("logs")
    })
}

/// Build the filter for the configured level
///
/// Dependency chatter (SQL statements, HTTP internals) is held back unless
/// the level is `trace`.
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| anyhow!("Invalid log level {:?}: {}", config.level, e))?;

    if !config.level.to_lowercase().contains("trace") {
        filter = filter
            .add_directive("sqlx::query=warn".parse()?)
            .add_directive("sqlx::sqlite=warn".parse()?)
            .add_directive("reqwest=info".parse()?)
            .add_directive("hyper=warn".parse()?)
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("html5ever=warn".parse()?)
            .add_directive("selectors=warn".parse()?)
            .add_directive(format!("job_market_scraper={}", config.level).parse()?)
            .add_directive(format!("job_market={}", config.level).parse()?);
    }

    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// Fails when neither console nor file output is enabled, or when a global
/// subscriber is already installed.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config)?;
    let registry = Registry::default().with(env_filter);

    let init_result = match (config.file_output, config.console_output) {
        (false, false) => return Err(anyhow!("No logging output configured")),
        (false, true) => registry.with(console_layer()).try_init(),
        (true, console) => {
            let log_dir = get_log_directory(config);
            std::fs::create_dir_all(&log_dir)
                .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

            let file_appender = rolling::never(&log_dir, &config.file_name);
            let (file_writer, file_guard) = non_blocking(file_appender);

            // Store the guard globally to prevent it from being dropped
            LOG_GUARDS
                .lock()
                .map_err(|_| anyhow!("Log guard registry poisoned"))?
                .push(file_guard);

            if config.json_format {
                let file_layer = fmt::Layer::new()
                    .json()
                    .with_writer(file_writer)
                    .with_timer(UtcTimeFormatter)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false);
                registry
                    .with(file_layer)
                    .with(console.then(console_layer))
                    .try_init()
            } else {
                let file_layer = fmt::Layer::new()
                    .with_writer(file_writer)
                    .with_timer(UtcTimeFormatter)
                    .with_target(false)
                    .with_ansi(false);
                registry
                    .with(file_layer)
                    .with(console.then(console_layer))
                    .try_init()
            }
        }
    };

    init_result.map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    if config.file_output {
        info!(
            "Log file: {:?}",
            get_log_directory(config).join(&config.file_name)
        );
    }

    Ok(())
}
