//! Parsing configuration for HTML extraction
//!
//! CSS selectors for the listing-card page template.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use super::error::{ParsingError, ParsingResult};

/// CSS selectors for listing pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Listing card container (tag + class)
    pub listing_container: String,

    /// Title anchor, also carries the relative href
    pub title: String,

    pub company: String,
    pub location: String,
    pub description: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            listing_container: "article.box_offer".to_string(),
            title: "a.js-o-link".to_string(),
            company: "a.it-blank".to_string(),
            location: "span.list-location".to_string(),
            description: "p.parrafo".to_string(),
        }
    }
}

/// Selectors compiled once at parser construction
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub listing_container: Selector,
    pub title: Selector,
    pub company: Selector,
    pub location: Selector,
    pub description: Selector,
}

impl ListingSelectors {
    pub fn compile(&self) -> ParsingResult<CompiledSelectors> {
        Ok(CompiledSelectors {
            listing_container: compile_selector("listing_container", &self.listing_container)?,
            title: compile_selector("title", &self.title)?,
            company: compile_selector("company", &self.company)?,
            location: compile_selector("location", &self.location)?,
            description: compile_selector("description", &self.description)?,
        })
    }
}

fn compile_selector(field: &'static str, selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(field, selector, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selectors_compile() {
        assert!(ListingSelectors::default().compile().is_ok());
    }

    #[test]
    fn broken_selector_names_its_field() {
        let selectors = ListingSelectors {
            company: "a[".to_string(),
            ..ListingSelectors::default()
        };
        let err = selectors.compile().unwrap_err();
        assert!(matches!(err, ParsingError::InvalidSelector { field: "company", .. }));
    }
}
