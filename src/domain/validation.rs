//! Validation errors raised before any work reaches the network or the store.

use thiserror::Error;

use super::constants::{MAX_PAGES_PER_RUN, MIN_PAGES_PER_RUN};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Number of pages must be between {min} and {max}, got {requested}")]
    PageCountOutOfRange { requested: u32, min: u32, max: u32 },

    #[error("Required field '{field}' is missing or empty")]
    MissingField { field: &'static str },

    #[error("URL '{url}' is not absolute: {reason}")]
    RelativeUrl { url: String, reason: String },
}

/// Reject page counts outside `[MIN_PAGES_PER_RUN, MAX_PAGES_PER_RUN]`.
pub fn validate_page_count(requested: u32) -> Result<u32, ValidationError> {
    if (MIN_PAGES_PER_RUN..=MAX_PAGES_PER_RUN).contains(&requested) {
        Ok(requested)
    } else {
        Err(ValidationError::PageCountOutOfRange {
            requested,
            min: MIN_PAGES_PER_RUN,
            max: MAX_PAGES_PER_RUN,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_bounds_are_inclusive() {
        assert_eq!(validate_page_count(1), Ok(1));
        assert_eq!(validate_page_count(10), Ok(10));
        assert!(matches!(
            validate_page_count(0),
            Err(ValidationError::PageCountOutOfRange { requested: 0, .. })
        ));
        assert!(matches!(
            validate_page_count(11),
            Err(ValidationError::PageCountOutOfRange { requested: 11, .. })
        ));
    }
}
