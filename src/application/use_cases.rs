//! Application use cases exposed to the calling layer
//!
//! [`JobMarketService`] wires the ingestor, the analyzer and the reporting
//! queries around one shared repository.

use anyhow::{Context, Result, anyhow};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

use crate::application::analyzer::TechnologyAnalyzer;
use crate::application::dto::{CleanupSummary, DashboardSummary, IngestionSummary};
use crate::application::ingestor::{IngestionError, Ingestor};
use crate::domain::constants::{
    COMPANY_BREAKDOWN_LIMIT, LOCATION_BREAKDOWN_LIMIT, RECENT_ACTIVITY_LIMIT, RECENT_WINDOW_DAYS,
};
use crate::domain::job_offer::{GroupCount, JobOffer, TechnologyStat};
use crate::domain::repositories::JobOfferRepository;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::parsing::JobListParser;
use crate::infrastructure::simple_http_client::PageFetcher;

pub struct JobMarketService {
    ingestor: Ingestor,
    analyzer: TechnologyAnalyzer,
    repository: Arc<dyn JobOfferRepository>,
}

impl JobMarketService {
    pub fn new(
        config: &AppConfig,
        fetcher: Arc<dyn PageFetcher>,
        repository: Arc<dyn JobOfferRepository>,
    ) -> Result<Self> {
        let parser = JobListParser::from_config(config).context("Invalid listing selectors")?;
        let analyzer = TechnologyAnalyzer::new(&config.analyzer.technologies)
            .context("Invalid technology vocabulary")?;
        let ingestor = Ingestor::new(
            fetcher,
            parser,
            Arc::clone(&repository),
            config.scraper.clone(),
        );

        Ok(Self {
            ingestor,
            analyzer,
            repository,
        })
    }

    /// Run one ingestion over pages `1..=page_count`
    pub async fn trigger_ingestion(
        &self,
        page_count: u32,
    ) -> Result<IngestionSummary, IngestionError> {
        self.ingestor.run(page_count).await
    }

    /// Technology ranking over every stored description
    pub async fn technology_demand(&self) -> Result<Vec<TechnologyStat>> {
        let descriptions = self.repository.all_descriptions().await?;
        Ok(self.analyzer.rank(&descriptions))
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let now = Utc::now();
        let total_offers = self.repository.count_all().await?;
        let distinct_companies = self.repository.count_distinct_companies().await?;
        let offers_last_seven_days = self
            .repository
            .count_since(now - Duration::days(RECENT_WINDOW_DAYS))
            .await?;
        let technologies_in_demand = self.technology_demand().await?.len();

        Ok(DashboardSummary {
            total_offers,
            distinct_companies,
            offers_last_seven_days,
            technologies_in_demand,
            generated_at: now,
        })
    }

    pub async fn company_stats(&self) -> Result<Vec<GroupCount>> {
        self.repository.company_breakdown(COMPANY_BREAKDOWN_LIMIT).await
    }

    pub async fn location_stats(&self) -> Result<Vec<GroupCount>> {
        self.repository.location_breakdown(LOCATION_BREAKDOWN_LIMIT).await
    }

    /// Newest offers by ingestion time
    pub async fn recent_activity(&self) -> Result<Vec<JobOffer>> {
        self.repository.recent(RECENT_ACTIVITY_LIMIT).await
    }

    /// Delete offers ingested more than `days` days ago
    pub async fn cleanup_older_than(&self, days: u32) -> Result<CleanupSummary> {
        if days == 0 {
            return Err(anyhow!("Retention period must be at least one day"));
        }

        let cutoff = Utc::now() - Duration::days(i64::from(days));
        let deleted_offers = self.repository.delete_ingested_before(cutoff).await?;
        info!("🧹 Deleted {} offers ingested before {}", deleted_offers, cutoff);

        Ok(CleanupSummary {
            cutoff,
            deleted_offers,
        })
    }
}
