//! Job list parser for listing pages
//!
//! Locates listing cards by their container selector and extracts the four
//! sub-elements of each card. Fragments missing a title, a title href or a
//! description are skipped; company and location fall back to
//! [`UNKNOWN_FIELD`].

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::config::{CompiledSelectors, ListingSelectors};
use super::error::{ParsingError, ParsingResult};
use crate::domain::constants::UNKNOWN_FIELD;
use crate::domain::job_offer::ListingCandidate;
use crate::infrastructure::config::AppConfig;

/// Result of running the parser over one fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtraction {
    /// Listing fragments found on the page, valid or not
    pub fragments_seen: usize,

    /// Fragments that produced a candidate, in document order
    pub candidates: Vec<ListingCandidate>,
}

impl PageExtraction {
    /// An empty page means the listing is exhausted
    pub const fn is_exhausted(&self) -> bool {
        self.fragments_seen == 0
    }

    pub const fn rejected(&self) -> usize {
        self.fragments_seen - self.candidates.len()
    }
}

/// Parser for extracting listing candidates from job search result pages
#[derive(Debug, Clone)]
pub struct JobListParser {
    selectors: CompiledSelectors,
    site_origin: String,
    source_label: String,
}

impl JobListParser {
    pub fn new(
        selectors: &ListingSelectors,
        site_origin: impl Into<String>,
        source_label: impl Into<String>,
    ) -> ParsingResult<Self> {
        Ok(Self {
            selectors: selectors.compile()?,
            site_origin: site_origin.into(),
            source_label: source_label.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> ParsingResult<Self> {
        Self::new(
            &config.selectors,
            config.scraper.site_origin.clone(),
            config.scraper.source_label.clone(),
        )
    }

    /// All nodes matching the listing-card pattern; empty when none match
    pub fn fragments<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document.select(&self.selectors.listing_container).collect()
    }

    /// Extract a candidate from one fragment, or `None` when a mandatory
    /// field is missing
    pub fn extract_candidate(
        &self,
        fragment: &ElementRef<'_>,
        source_label: &str,
    ) -> Option<ListingCandidate> {
        match self.try_extract(fragment, source_label) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                debug!("Skipping listing fragment: {}", e);
                None
            }
        }
    }

    /// Parse a whole page body into candidates
    ///
    /// The document never outlives this call, so callers can hold the
    /// result across `.await` points.
    pub fn parse_page(&self, html: &str) -> PageExtraction {
        let document = Html::parse_document(html);
        let fragments = self.fragments(&document);

        let candidates: Vec<ListingCandidate> = fragments
            .iter()
            .filter_map(|fragment| self.extract_candidate(fragment, &self.source_label))
            .collect();

        debug!(
            "Extracted {} candidates from {} listing fragments",
            candidates.len(),
            fragments.len()
        );

        PageExtraction {
            fragments_seen: fragments.len(),
            candidates,
        }
    }

    fn try_extract(
        &self,
        fragment: &ElementRef<'_>,
        source_label: &str,
    ) -> ParsingResult<ListingCandidate> {
        let title_element = fragment
            .select(&self.selectors.title)
            .next()
            .ok_or_else(|| ParsingError::required_field_missing("title"))?;

        let title = element_text(&title_element)
            .ok_or_else(|| ParsingError::required_field_missing("title"))?;

        let description = first_text(fragment, &self.selectors.description)
            .ok_or_else(|| ParsingError::required_field_missing("description"))?;

        let href = title_element
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .ok_or(ParsingError::MissingHref)?;

        let url = self.canonical_url(href)?;

        Ok(ListingCandidate {
            title,
            company: first_text(fragment, &self.selectors.company)
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            location: first_text(fragment, &self.selectors.location)
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            description,
            url,
            source: source_label.to_string(),
        })
    }

    /// Site origin + relative href; absolute hrefs are kept as they are
    fn canonical_url(&self, href: &str) -> ParsingResult<String> {
        let resolved = if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.site_origin.trim_end_matches('/'), href)
        } else {
            format!("{}/{}", self.site_origin.trim_end_matches('/'), href)
        };

        match Url::parse(&resolved) {
            Ok(_) => Ok(resolved),
            Err(e) => Err(ParsingError::UrlResolutionFailed {
                url: resolved,
                reason: e.to_string(),
            }),
        }
    }
}

fn element_text(element: &ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn first_text(fragment: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    fragment.select(selector).next().and_then(|e| element_text(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://www.computrabajo.com.co";

    fn parser() -> JobListParser {
        JobListParser::new(&ListingSelectors::default(), ORIGIN, "Computrabajo").unwrap()
    }

    fn card(
        title: Option<(&str, Option<&str>)>,
        company: Option<&str>,
        location: Option<&str>,
        description: Option<&str>,
    ) -> String {
        let mut html = String::from(r#"<article class="box_offer">"#);
        if let Some((text, href)) = title {
            match href {
                Some(href) => html.push_str(&format!(
                    r#"<h2><a class="js-o-link" href="{href}">{text}</a></h2>"#
                )),
                None => html.push_str(&format!(r#"<h2><a class="js-o-link">{text}</a></h2>"#)),
            }
        }
        if let Some(company) = company {
            html.push_str(&format!(r#"<a class="it-blank" href="/empresa">{company}</a>"#));
        }
        if let Some(location) = location {
            html.push_str(&format!(r#"<span class="list-location">{location}</span>"#));
        }
        if let Some(description) = description {
            html.push_str(&format!(r#"<p class="parrafo">{description}</p>"#));
        }
        html.push_str("</article>");
        html
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><div id=\"offers\">{}</div></body></html>", cards.concat())
    }

    #[test]
    fn extracts_complete_card() {
        let html = page(&[card(
            Some(("  Desarrollador Python  ", Some("/ofertas-de-trabajo/oferta-123"))),
            Some(" Acme S.A.S "),
            Some("Bogotá, D.C."),
            Some("\n  Python  and Django developer \n"),
        )]);

        let extraction = parser().parse_page(&html);
        assert_eq!(extraction.fragments_seen, 1);
        assert_eq!(
            extraction.candidates,
            vec![ListingCandidate {
                title: "Desarrollador Python".to_string(),
                company: "Acme S.A.S".to_string(),
                location: "Bogotá, D.C.".to_string(),
                description: "Python  and Django developer".to_string(),
                url: "https://www.computrabajo.com.co/ofertas-de-trabajo/oferta-123".to_string(),
                source: "Computrabajo".to_string(),
            }]
        );
    }

    #[test]
    fn defaults_missing_company_and_location() {
        let html = page(&[card(Some(("Dev", Some("/o/1"))), None, None, Some("desc"))]);
        let candidate = &parser().parse_page(&html).candidates[0];
        assert_eq!(candidate.company, UNKNOWN_FIELD);
        assert_eq!(candidate.location, UNKNOWN_FIELD);
    }

    #[test]
    fn skips_fragments_missing_mandatory_fields() {
        let html = page(&[
            card(Some(("No description", Some("/o/1"))), Some("Acme"), None, None),
            card(None, Some("Acme"), None, Some("No title")),
            card(Some(("No href", None)), Some("Acme"), None, Some("desc")),
            card(Some(("   ", Some("/o/4"))), Some("Acme"), None, Some("blank title")),
            card(Some(("Valid", Some("/o/5"))), None, None, Some("desc")),
        ]);

        let extraction = parser().parse_page(&html);
        assert_eq!(extraction.fragments_seen, 5);
        assert_eq!(extraction.rejected(), 4);
        assert_eq!(extraction.candidates.len(), 1);
        assert_eq!(extraction.candidates[0].title, "Valid");
    }

    #[test]
    fn page_without_cards_is_exhausted() {
        let extraction = parser().parse_page("<html><body><p>Sin resultados</p></body></html>");
        assert!(extraction.is_exhausted());
        assert!(extraction.candidates.is_empty());
    }

    #[test]
    fn fragments_match_only_container_pattern() {
        let html = r#"<div class="box_offer"><a class="js-o-link" href="/o/1">x</a></div>
                      <article class="other"><a class="js-o-link" href="/o/2">y</a></article>"#;
        let document = Html::parse_document(html);
        assert!(parser().fragments(&document).is_empty());
    }

    #[test]
    fn extract_candidate_uses_given_source_label() {
        let html = page(&[card(Some(("Dev", Some("/o/1"))), None, None, Some("desc"))]);
        let document = Html::parse_document(&html);
        let parser = parser();
        let fragments = parser.fragments(&document);
        let candidate = parser.extract_candidate(&fragments[0], "OtherSite").unwrap();
        assert_eq!(candidate.source, "OtherSite");
    }

    #[test]
    fn canonical_url_resolution() {
        let parser = parser();
        assert_eq!(
            parser.canonical_url("/ofertas/1").unwrap(),
            "https://www.computrabajo.com.co/ofertas/1"
        );
        assert_eq!(
            parser.canonical_url("ofertas/1").unwrap(),
            "https://www.computrabajo.com.co/ofertas/1"
        );
        assert_eq!(
            parser.canonical_url("https://other.example/x").unwrap(),
            "https://other.example/x"
        );
    }

    #[test]
    fn case_is_preserved_verbatim() {
        let html = page(&[card(
            Some(("SENIOR Go Dev", Some("/O/ABC"))),
            None,
            None,
            Some("GoLang"),
        )]);
        let candidate = &parser().parse_page(&html).candidates[0];
        assert_eq!(candidate.title, "SENIOR Go Dev");
        assert_eq!(candidate.url, "https://www.computrabajo.com.co/O/ABC");
    }
}
