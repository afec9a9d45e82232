//! Link validation
//!
//! Decides whether a raw href found on a page is a crawlable child of that
//! page. Rules are applied in order and the first failing rule rejects:
//!
//! 1. Empty, whitespace-only and fragment-only (`#...`) links are rejected
//! 2. Links starting with `/` are resolved against the parent's directory;
//!    anything else must already be an absolute URI
//! 3. The scheme must be `http` or `https`
//! 4. The host must equal the parent's host (case-insensitive)
//! 5. The path and query must differ from the parent's (case-insensitive)
//!
//! No I/O happens here.

use crate::uri::normalize::{parent_directory, path_and_query};
use thiserror::Error;
use url::Url;

/// Why a link was not admitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkRejection {
    #[error("empty link")]
    Empty,

    #[error("fragment-only link: {0}")]
    Fragment(String),

    #[error("not a valid absolute link: {0}")]
    NotAbsolute(String),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("different host: {0}")]
    ForeignHost(String),

    #[error("same page as parent: {0}")]
    SamePage(String),
}

/// Validates `link` relative to `parent` and returns the absolute URI
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webcrawler::uri::{validate_link, LinkRejection};
///
/// let parent = Url::parse("http://a.com/x").unwrap();
/// assert_eq!(validate_link("/y", &parent).unwrap().as_str(), "http://a.com/y");
/// assert!(matches!(
///     validate_link("http://other.com/z", &parent),
///     Err(LinkRejection::ForeignHost(_))
/// ));
/// ```
pub fn validate_link(link: &str, parent: &Url) -> Result<Url, LinkRejection> {
    let link = link.trim();

    if link.is_empty() {
        return Err(LinkRejection::Empty);
    }

    if link.starts_with('#') {
        return Err(LinkRejection::Fragment(link.to_string()));
    }

    let resolved = if link.starts_with('/') {
        parent_directory(parent)
            .join(link)
            .map_err(|_| LinkRejection::NotAbsolute(link.to_string()))?
    } else {
        Url::parse(link).map_err(|_| LinkRejection::NotAbsolute(link.to_string()))?
    };

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return Err(LinkRejection::UnsupportedScheme(
            resolved.scheme().to_string(),
        ));
    }

    let same_host = match (resolved.host_str(), parent.host_str()) {
        (Some(child), Some(parent)) => child.eq_ignore_ascii_case(parent),
        _ => false,
    };
    if !same_host {
        return Err(LinkRejection::ForeignHost(
            resolved.host_str().unwrap_or_default().to_string(),
        ));
    }

    if path_and_query(&resolved).to_lowercase() == path_and_query(parent).to_lowercase() {
        return Err(LinkRejection::SamePage(resolved.to_string()));
    }

    Ok(resolved)
}
