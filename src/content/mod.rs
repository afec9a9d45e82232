//! Content module for turning downloaded pages into child links
//!
//! This module contains:
//! - The HTML parsing collaborator (raw `href` extraction)
//! - Link extraction and de-duplication for a single page
//! - Content-type dispatch to the matching handler

mod extractor;
mod handler;
mod parser;

pub use extractor::LinkExtractor;
pub use handler::{dispatch, ContentError, ContentHandler, HandlerOutcome};
pub use parser::{HtmlParser, ScraperParser};
