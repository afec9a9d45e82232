//! Fetch module for retrieving page content
//!
//! This module contains:
//! - The HTTP download client with bounded exponential-backoff retries
//! - The cache collaborator and its in-memory implementation
//! - The read-through content repository that sits in front of both

mod cache;
mod client;
mod repository;
mod retry;

pub use cache::{ContentCache, MemoryCache};
pub use client::{build_http_client, Downloader, HttpDownloader};
pub use repository::{cache_key, ContentRepository};
pub use retry::RetryPolicy;

/// A downloaded page body with its content type
///
/// The body is always read as text. The content type is the raw
/// `Content-Type` header value, or an empty string when the server sent none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebContent {
    pub body: String,
    pub content_type: String,
}
