//! HTTP client for fetching listing pages
//!
//! One GET per page with a per-request timeout and a fixed
//! browser-identifying header set. There is no retry and no backoff: a
//! failed page is reported to the caller as a [`FetchError`] and the page
//! loop decides what to do with it.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::infrastructure::config::{ScraperConfig, defaults};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Page {page}: HTTP error {status} for {url}")]
    Status { page: u32, url: String, status: u16 },

    #[error("Page {page}: request to {url} timed out")]
    Timeout { page: u32, url: String },

    #[error("Page {page}: transport failure for {url}: {message}")]
    Transport {
        page: u32,
        url: String,
        message: String,
    },

    #[error("Page {page}: failed to read response body from {url}: {message}")]
    Body {
        page: u32,
        url: String,
        message: String,
    },
}

impl FetchError {
    pub const fn page(&self) -> u32 {
        match self {
            Self::Status { page, .. }
            | Self::Timeout { page, .. }
            | Self::Transport { page, .. }
            | Self::Body { page, .. } => *page,
        }
    }

    fn from_request(page: u32, url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                page,
                url: url.to_string(),
            }
        } else {
            let kind = if error.is_connect() {
                "connection failed"
            } else if error.is_builder() {
                "invalid request"
            } else {
                "request failed"
            };
            Self::Transport {
                page,
                url: url.to_string(),
                message: format!("{kind}: {error}"),
            }
        }
    }
}

/// Source of listing page bodies
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page body in a single attempt
    async fn fetch(&self, page: u32, url: &str, timeout: Duration) -> Result<String, FetchError>;
}

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Default request timeout, overridable per call
    pub timeout: Duration,
    pub user_agent: String,
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    pub fn from_scraper_config(scraper: &ScraperConfig) -> Self {
        Self {
            timeout: scraper.request_timeout(),
            user_agent: scraper.user_agent.clone(),
            follow_redirects: true,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECONDS),
            user_agent: defaults::USER_AGENT.to_string(),
            follow_redirects: true,
        }
    }
}

/// reqwest-backed [`PageFetcher`]
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn from_scraper_config(scraper: &ScraperConfig) -> anyhow::Result<Self> {
        Self::with_config(HttpClientConfig::from_scraper_config(scraper))
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("es-CO,es;q=0.9,en;q=0.8"));

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, page: u32, url: &str, timeout: Duration) -> Result<String, FetchError> {
        info!("🌐 HTTP GET (page {}): {}", page, url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_request(page, url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                page,
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    page,
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    page,
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        debug!("Fetched {} bytes from page {}", body.len(), page);
        Ok(body)
    }
}
