//! Content-type dispatch
//!
//! Downloaded content is routed to a handler chosen by its normalized
//! content type. Only HTML has a handler; every other type is reported as
//! unsupported, which the page processor treats like a failed download.

use crate::content::extractor::LinkExtractor;
use crate::fetch::WebContent;
use thiserror::Error;
use url::Url;

const HTML_CONTENT_TYPE: &str = "text/html";

/// Errors raised while dispatching downloaded content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("Content type '{0}' is not supported")]
    Unsupported(String),
}

/// Handlers for supported content types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentHandler {
    Html,
}

/// What a handler produced for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOutcome {
    pub links: Vec<Url>,
}

/// Resolves the handler for a `Content-Type` header value
///
/// Matching is case-insensitive and ignores parameters such as `charset`.
pub fn dispatch(content_type: &str) -> Result<ContentHandler, ContentError> {
    let normalized = content_type.trim().to_ascii_lowercase();

    if normalized.contains(HTML_CONTENT_TYPE) {
        return Ok(ContentHandler::Html);
    }

    Err(ContentError::Unsupported(content_type.trim().to_string()))
}

impl ContentHandler {
    pub fn handle(
        &self,
        content: &WebContent,
        page_uri: &Url,
        extractor: &LinkExtractor,
    ) -> HandlerOutcome {
        match self {
            Self::Html => HandlerOutcome {
                links: extractor.extract(&content.body, page_uri),
            },
        }
    }
}
