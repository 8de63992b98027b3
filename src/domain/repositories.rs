//! Repository interfaces for job offers
//!
//! Contains the trait the ingestor, analyzer and reporting code use to reach
//! the persistence collaborator.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::job_offer::{GroupCount, JobOffer, NewJobOffer};

#[async_trait]
pub trait JobOfferRepository: Send + Sync {
    // Deduplication
    async fn find_by_url(&self, url: &str) -> Result<Option<JobOffer>>;
    async fn exists_by_url(&self, url: &str) -> Result<bool>;

    /// Insert every staged offer of one page inside a single transaction.
    ///
    /// Either all offers are committed and their ids returned, or the
    /// transaction is rolled back and nothing from the page is persisted.
    async fn insert_page(&self, offers: &[NewJobOffer]) -> Result<Vec<i64>>;

    // Analysis input
    async fn all_descriptions(&self) -> Result<Vec<String>>;

    // Statistics and summary
    async fn count_all(&self) -> Result<u64>;
    async fn count_since(&self, since: DateTime<Utc>) -> Result<u64>;
    async fn count_distinct_companies(&self) -> Result<u64>;
    async fn company_breakdown(&self, limit: u32) -> Result<Vec<GroupCount>>;
    async fn location_breakdown(&self, limit: u32) -> Result<Vec<GroupCount>>;
    async fn recent(&self, limit: u32) -> Result<Vec<JobOffer>>;

    // Retention cleanup
    async fn delete_ingested_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}
