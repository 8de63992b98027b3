//! Sequential page-loop ingestion
//!
//! Pages are fetched one at a time. Every failure inside a page is scoped to
//! that page: fetch errors skip it, persistence errors roll back its staged
//! offers. The run ends early only when a page yields no listing fragments.

use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::application::deduplicator::Deduplicator;
use crate::application::dto::IngestionSummary;
use crate::domain::job_offer::NewJobOffer;
use crate::domain::repositories::JobOfferRepository;
use crate::domain::validation::{ValidationError, validate_page_count};
use crate::infrastructure::config::ScraperConfig;
use crate::infrastructure::parsing::JobListParser;
use crate::infrastructure::simple_http_client::PageFetcher;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(anyhow::Error),
}

pub struct Ingestor {
    fetcher: Arc<dyn PageFetcher>,
    parser: JobListParser,
    repository: Arc<dyn JobOfferRepository>,
    config: ScraperConfig,
}

enum PageOutcome {
    Exhausted,
    Committed(usize),
    RolledBack,
}

impl Ingestor {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        parser: JobListParser,
        repository: Arc<dyn JobOfferRepository>,
        config: ScraperConfig,
    ) -> Self {
        Self {
            fetcher,
            parser,
            repository,
            config,
        }
    }

    /// Ingest pages `1..=page_count`
    ///
    /// Rejects an out-of-range page count before any network activity.
    pub async fn run(&self, page_count: u32) -> Result<IngestionSummary, IngestionError> {
        let page_count = validate_page_count(page_count)?;

        let stored_before = self
            .repository
            .count_all()
            .await
            .context("Job offer store unavailable")
            .map_err(IngestionError::Repository)?;

        info!(
            "🚀 Starting ingestion of up to {} pages ({} offers stored)",
            page_count, stored_before
        );

        let mut summary = IngestionSummary::started(Utc::now());
        let mut deduplicator = Deduplicator::new(Arc::clone(&self.repository));

        for page in 1..=page_count {
            if page > 1 {
                let delay = self.config.page_delay();
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            let url = self.config.page_url(page);
            let html = match self
                .fetcher
                .fetch(page, &url, self.config.request_timeout())
                .await
            {
                Ok(html) => html,
                Err(e) => {
                    warn!("⚠️ Skipping page {}: {}", e.page(), e);
                    summary.pages_failed += 1;
                    continue;
                }
            };

            match self
                .process_page(page, &html, &mut deduplicator, &mut summary)
                .await
            {
                PageOutcome::Exhausted => {
                    info!("📭 Page {} has no listings, stopping", page);
                    summary.stopped_on_exhaustion = true;
                    break;
                }
                PageOutcome::Committed(added) => {
                    summary.offers_added += added;
                    info!("✅ Page {}: {} new offers committed", page, added);
                }
                PageOutcome::RolledBack => summary.pages_rolled_back += 1,
            }
        }

        summary.completed_at = Some(Utc::now());
        info!(
            "🏁 Ingestion finished: {} pages processed, {} offers added, {} candidates seen",
            summary.pages_processed, summary.offers_added, summary.total_candidates_seen
        );

        Ok(summary)
    }

    async fn process_page(
        &self,
        page: u32,
        html: &str,
        deduplicator: &mut Deduplicator,
        summary: &mut IngestionSummary,
    ) -> PageOutcome {
        let extraction = self.parser.parse_page(html);
        summary.pages_processed += 1;
        summary.total_candidates_seen += extraction.fragments_seen;

        if extraction.is_exhausted() {
            return PageOutcome::Exhausted;
        }
        summary.fragments_rejected += extraction.rejected();

        let ingested_at = Utc::now();
        let mut staged = Vec::with_capacity(extraction.candidates.len());
        deduplicator.begin_page();

        for candidate in &extraction.candidates {
            match deduplicator.is_duplicate(&candidate.url).await {
                Ok(true) => {
                    debug!("Duplicate offer skipped: {}", candidate.url);
                    summary.duplicates_skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    error!(
                        "❌ Page {}: duplicate lookup failed, discarding page: {:#}",
                        page, e
                    );
                    return PageOutcome::RolledBack;
                }
            }

            match NewJobOffer::from_candidate(candidate, ingested_at) {
                Ok(offer) => {
                    deduplicator.stage(offer.url());
                    staged.push(offer);
                }
                Err(e) => {
                    debug!("Rejected candidate {}: {}", candidate.url, e);
                    summary.fragments_rejected += 1;
                }
            }
        }

        match self.repository.insert_page(&staged).await {
            Ok(ids) => PageOutcome::Committed(ids.len()),
            Err(e) => {
                warn!(
                    "⚠️ Page {}: commit failed, rolled back {} offers: {:#}",
                    page,
                    staged.len(),
                    e
                );
                PageOutcome::RolledBack
            }
        }
    }
}
