//! Application layer module
//!
//! This module contains the ingestion page loop, technology analysis and the
//! use cases that orchestrate them for the calling layer.

pub mod analyzer;
pub mod deduplicator;
pub mod dto;
pub mod ingestor;
pub mod use_cases;

pub use analyzer::{TechnologyAnalyzer, rank};
pub use deduplicator::Deduplicator;
pub use dto::{CleanupSummary, DashboardSummary, IngestionSummary};
pub use ingestor::{IngestionError, Ingestor};
pub use use_cases::JobMarketService;
