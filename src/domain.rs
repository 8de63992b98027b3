//! Domain module - Core entities and persistence contracts
//!
//! This module contains the job-offer entities, the typed constructor that
//! guards the persistence boundary, and the repository trait implemented by
//! the infrastructure layer.

pub mod constants;
pub mod job_offer;
pub mod repositories;
pub mod validation;

// Re-export commonly used items for convenience
pub use job_offer::{
    GroupCount, JobOffer, ListingCandidate, NewJobOffer, NewJobOfferBuilder, TechnologyStat,
};
pub use repositories::JobOfferRepository;
pub use validation::{ValidationError, validate_page_count};
