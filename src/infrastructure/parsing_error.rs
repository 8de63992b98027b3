//! Parsing error types for listing extraction
//!
//! Extraction failures never reach the page loop: the parser turns them into
//! a skipped fragment at the candidate boundary.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector for {field}: {selector} - {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },

    #[error("Required field '{field}' not found in listing fragment")]
    RequiredFieldMissing { field: &'static str },

    #[error("Title element has no href attribute")]
    MissingHref,

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed { url: String, reason: String },
}

impl ParsingError {
    pub const fn required_field_missing(field: &'static str) -> Self {
        Self::RequiredFieldMissing { field }
    }

    pub fn invalid_selector(field: &'static str, selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            field,
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
