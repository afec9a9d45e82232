//! HTML parser for extracting raw link targets
//!
//! Parsing is best-effort: malformed markup yields whatever anchors the
//! parser could recover, and empty input yields no links.

use scraper::{Html, Selector};

/// Turns raw markup into the `href` values of its anchors
pub trait HtmlParser: Send + Sync {
    /// Returns raw, unvalidated `href` attribute values in document order
    fn links(&self, markup: &str) -> Vec<String>;
}

/// [`HtmlParser`] backed by the `scraper` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperParser;

impl HtmlParser for ScraperParser {
    fn links(&self, markup: &str) -> Vec<String> {
        if markup.trim().is_empty() {
            return Vec::new();
        }

        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        let document = Html::parse_document(markup);
        document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .filter(|href| !href.is_empty())
            .map(str::to_string)
            .collect()
    }
}
