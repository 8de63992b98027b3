//! Data Transfer Objects returned to the calling layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSummary {
    /// Pages fetched and parsed, including the exhausting empty page
    pub pages_processed: u32,

    /// Offers whose page commit succeeded
    pub offers_added: usize,

    /// Listing fragments seen across all parsed pages
    pub total_candidates_seen: usize,

    pub pages_failed: u32,
    pub pages_rolled_back: u32,
    pub duplicates_skipped: usize,
    pub fragments_rejected: usize,
    pub stopped_on_exhaustion: bool,
    pub started_at: Option<DateTime<Utc>>,

    /// Completion timestamp of the run
    pub completed_at: Option<DateTime<Utc>>,
}

impl IngestionSummary {
    pub fn started(at: DateTime<Utc>) -> Self {
        Self {
            started_at: Some(at),
            ..Self::default()
        }
    }
}

/// Headline figures for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_offers: u64,
    pub distinct_companies: u64,
    pub offers_last_seven_days: u64,
    pub technologies_in_demand: usize,
    pub generated_at: DateTime<Utc>,
}

/// Result of a retention cleanup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupSummary {
    pub cutoff: DateTime<Utc>,
    pub deleted_offers: u64,
}
