use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::constants::UNKNOWN_FIELD;
use super::validation::ValidationError;

/// A listing fragment that carried every mandatory field
///
/// Produced by the list parser and consumed by the ingestor. Company and
/// location are already defaulted to [`UNKNOWN_FIELD`] when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingCandidate {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub source: String,
}

/// Persisted job offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOffer {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub source: String,
    #[serde(rename = "ingestedAt")]
    pub ingested_at: DateTime<Utc>,
}

/// Job offer staged for insertion; identity is assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJobOffer {
    title: String,
    company: String,
    location: String,
    description: String,
    url: String,
    source: String,
    ingested_at: DateTime<Utc>,
}

impl NewJobOffer {
    pub fn builder() -> NewJobOfferBuilder {
        NewJobOfferBuilder::default()
    }

    /// Build the record the ingestor stages for a freshly parsed candidate
    pub fn from_candidate(
        candidate: &ListingCandidate,
        ingested_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Self::builder()
            .title(&candidate.title)
            .company(&candidate.company)
            .location(&candidate.location)
            .description(&candidate.description)
            .url(&candidate.url)
            .source(&candidate.source)
            .ingested_at(ingested_at)
            .build()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub const fn ingested_at(&self) -> DateTime<Utc> {
        self.ingested_at
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewJobOfferBuilder {
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    description: Option<String>,
    url: Option<String>,
    source: Option<String>,
    ingested_at: Option<DateTime<Utc>>,
}

impl NewJobOfferBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub const fn ingested_at(mut self, ingested_at: DateTime<Utc>) -> Self {
        self.ingested_at = Some(ingested_at);
        self
    }

    /// Validate mandatory fields and produce a record ready for the store
    pub fn build(self) -> Result<NewJobOffer, ValidationError> {
        let title = required(self.title, "title")?;
        let description = required(self.description, "description")?;
        let url = required(self.url, "url")?;
        let source = required(self.source, "source")?;
        ensure_absolute(&url)?;

        Ok(NewJobOffer {
            title,
            company: or_unknown(self.company),
            location: or_unknown(self.location),
            description,
            url,
            source,
            ingested_at: self.ingested_at.unwrap_or_else(Utc::now),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingField { field })
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
}

fn ensure_absolute(url: &str) -> Result<(), ValidationError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(ValidationError::RelativeUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        }),
        Err(e) => Err(ValidationError::RelativeUrl {
            url: url.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Number of distinct descriptions mentioning a vocabulary term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyStat {
    pub technology: String,
    pub count: u32,
}

impl TechnologyStat {
    pub fn new(technology: impl Into<String>, count: u32) -> Self {
        Self {
            technology: technology.into(),
            count,
        }
    }
}

/// Grouped count row used by company/location breakdowns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub name: String,
    #[serde(rename = "offerCount")]
    pub offer_count: u32,
}
