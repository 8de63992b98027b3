//! URL-identity deduplication
//!
//! Comparison is exact string equality on the canonical URL. No
//! normalization of trailing slashes, case, scheme or query order.

use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::repositories::JobOfferRepository;

pub struct Deduplicator {
    repository: Arc<dyn JobOfferRepository>,
    staged: HashSet<String>,
}

impl Deduplicator {
    pub fn new(repository: Arc<dyn JobOfferRepository>) -> Self {
        Self {
            repository,
            staged: HashSet::new(),
        }
    }

    /// Whether an offer with this URL is already persisted
    pub async fn exists(&self, url: &str) -> Result<bool> {
        self.repository.exists_by_url(url).await
    }

    /// Forget URLs staged on the previous page
    pub fn begin_page(&mut self) {
        self.staged.clear();
    }

    /// Persisted, or already staged on the current page
    pub async fn is_duplicate(&self, url: &str) -> Result<bool> {
        if self.staged.contains(url) {
            return Ok(true);
        }
        self.exists(url).await
    }

    pub fn stage(&mut self, url: &str) {
        self.staged.insert(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job_offer::NewJobOffer;
    use crate::infrastructure::database_connection::DatabaseConnection;
    use crate::infrastructure::job_offer_repository::SqliteJobOfferRepository;

    async fn deduplicator_with(urls: &[&str]) -> Deduplicator {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let repo = SqliteJobOfferRepository::new(db.pool().clone());
        let offers: Vec<NewJobOffer> = urls
            .iter()
            .map(|url| {
                NewJobOffer::builder()
                    .title("Dev")
                    .description("Rust")
                    .url(*url)
                    .source("Computrabajo")
                    .build()
                    .unwrap()
            })
            .collect();
        repo.insert_page(&offers).await.unwrap();
        Deduplicator::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn exact_match_only() {
        let dedup = deduplicator_with(&["https://example.com/o/1"]).await;
        assert!(dedup.exists("https://example.com/o/1").await.unwrap());
        assert!(!dedup.exists("https://example.com/o/1/").await.unwrap());
        assert!(!dedup.exists("https://example.com/O/1").await.unwrap());
    }

    #[tokio::test]
    async fn staged_urls_are_page_scoped() {
        let mut dedup = deduplicator_with(&[]).await;
        dedup.begin_page();
        assert!(!dedup.is_duplicate("https://example.com/o/9").await.unwrap());
        dedup.stage("https://example.com/o/9");
        assert!(dedup.is_duplicate("https://example.com/o/9").await.unwrap());

        dedup.begin_page();
        assert!(!dedup.is_duplicate("https://example.com/o/9").await.unwrap());
    }
}
