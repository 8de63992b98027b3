//! Request validation and analyzer properties.

use async_trait::async_trait;
use proptest::prelude::*;
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use job_market_scraper::application::{IngestionError, JobMarketService, rank};
use job_market_scraper::domain::ValidationError;
use job_market_scraper::infrastructure::config::AppConfig;
use job_market_scraper::infrastructure::{
    DatabaseConnection, FetchError, PageFetcher, SqliteJobOfferRepository,
};

#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl PageFetcher for CountingFetcher {
    async fn fetch(
        &self,
        _page: u32,
        _url: &str,
        _timeout: Duration,
    ) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(String::from("<html><body></body></html>"))
    }
}

async fn service(fetcher: Arc<CountingFetcher>) -> JobMarketService {
    let mut config = AppConfig::default();
    config.scraper.page_delay_ms = 0;
    let db = DatabaseConnection::in_memory().await.unwrap();
    let repository = Arc::new(SqliteJobOfferRepository::new(db.pool().clone()));
    JobMarketService::new(&config, fetcher, repository).unwrap()
}

#[rstest]
#[case(0)]
#[case(11)]
#[case(u32::MAX)]
#[tokio::test]
async fn out_of_range_page_count_is_rejected_without_fetching(#[case] pages: u32) {
    let fetcher = Arc::new(CountingFetcher::default());
    let service = service(Arc::clone(&fetcher)).await;

    let err = service.trigger_ingestion(pages).await.unwrap_err();

    assert!(matches!(
        err,
        IngestionError::Validation(ValidationError::PageCountOutOfRange {
            requested,
            min: 1,
            max: 10,
        }) if requested == pages
    ));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case(1)]
#[case(10)]
#[tokio::test]
async fn bounds_are_accepted(#[case] pages: u32) {
    let fetcher = Arc::new(CountingFetcher::default());
    let service = service(Arc::clone(&fetcher)).await;

    let summary = service.trigger_ingestion(pages).await.unwrap();

    // The first page is empty, so the run stops after one fetch
    assert_eq!(summary.pages_processed, 1);
    assert!(summary.stopped_on_exhaustion);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_store_has_no_technology_demand() {
    let service = service(Arc::new(CountingFetcher::default())).await;
    assert!(service.technology_demand().await.unwrap().is_empty());
}

fn vocabulary() -> Vec<String> {
    ["Python", "Go", "Java", "Rust", "SQL", "C#"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn description() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "Python", "python", "Go", "Google", "java", "JavaScript", "Rust", "rusty", "SQL",
            "MySQL", "C#", "and", "senior", "developer", ",", ".",
        ]),
        0..12,
    )
    .prop_map(|words| words.join(" "))
}

fn descriptions() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(description(), 0..20)
}

fn mentions(description: &str, term: &str) -> bool {
    description
        .split(' ')
        .any(|word| word.eq_ignore_ascii_case(term))
}

proptest! {
    #[test]
    fn ranking_counts_whole_word_mentions(descriptions in descriptions()) {
        let vocabulary = vocabulary();
        let stats = rank(&vocabulary, &descriptions).unwrap();

        for stat in &stats {
            prop_assert!(stat.count > 0);
            let expected = descriptions.iter().filter(|d| mentions(d, &stat.technology)).count();
            prop_assert_eq!(stat.count as usize, expected);
        }

        for term in &vocabulary {
            let present = descriptions.iter().any(|d| mentions(d, term));
            prop_assert_eq!(present, stats.iter().any(|s| &s.technology == term));
        }
    }

    #[test]
    fn ranking_is_sorted_with_vocabulary_tie_break(descriptions in descriptions()) {
        let vocabulary = vocabulary();
        let stats = rank(&vocabulary, &descriptions).unwrap();

        for pair in stats.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
            if pair[0].count == pair[1].count {
                let first = vocabulary.iter().position(|t| *t == pair[0].technology);
                let second = vocabulary.iter().position(|t| *t == pair[1].technology);
                prop_assert!(first < second);
            }
        }
    }
}
