use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

use job_market_scraper::application::{IngestionError, JobMarketService};
use job_market_scraper::domain::constants::MAX_PAGES_PER_RUN;
use job_market_scraper::infrastructure::{
    AppConfig, DatabaseConnection, HttpClient, SqliteJobOfferRepository, init_logging_with_config,
};

#[derive(Debug, Parser)]
#[command(
    name = "job-market",
    version,
    about = "Job listing ingestion and technology demand analysis"
)]
struct CliArgs {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "JOB_MARKET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ingest listing pages 1..=N
    Scrape {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Technology demand ranking
    Technologies,
    /// Headline figures
    Dashboard,
    /// Top hiring companies
    Companies,
    /// Top locations
    Locations,
    /// Newest offers
    Recent,
    /// Delete offers ingested more than N days ago
    Cleanup {
        #[arg(long)]
        days: u32,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let config = AppConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    init_logging_with_config(&config.logging)?;

    let db = DatabaseConnection::from_config(&config.database).await?;
    db.migrate().await.context("failed to prepare database schema")?;

    let repository = Arc::new(SqliteJobOfferRepository::new(db.pool().clone()));
    let fetcher = Arc::new(HttpClient::from_scraper_config(&config.scraper)?);
    let service = JobMarketService::new(&config, fetcher, repository)?;

    match args.command {
        Command::Scrape { pages } => match service.trigger_ingestion(pages).await {
            Ok(summary) => print_json(&summary)?,
            Err(IngestionError::Validation(e)) => {
                error!("Ingestion rejected: {}", e);
                anyhow::bail!("scrape accepts 1 to {MAX_PAGES_PER_RUN} pages: {e}");
            }
            Err(e) => return Err(e.into()),
        },
        Command::Technologies => print_json(&service.technology_demand().await?)?,
        Command::Dashboard => print_json(&service.dashboard_summary().await?)?,
        Command::Companies => print_json(&service.company_stats().await?)?,
        Command::Locations => print_json(&service.location_stats().await?)?,
        Command::Recent => print_json(&service.recent_activity().await?)?,
        Command::Cleanup { days } => print_json(&service.cleanup_older_than(days).await?)?,
    }

    db.pool().close().await;
    Ok(())
}
