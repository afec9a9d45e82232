//! HTTP download client
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - Retrying non-2xx responses and network errors with exponential backoff
//! - Reading the final response body as text

use crate::config::InfrastructureOptions;
use crate::fetch::retry::RetryPolicy;
use crate::fetch::WebContent;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::fmt;
use url::Url;

/// Fetches the content behind a URI
///
/// `None` means the fetch failed terminally. Failures are logged by the
/// implementation and never surface as errors to the crawl engine.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, uri: &Url) -> Option<WebContent>;
}

/// Builds an HTTP client with the configured user agent and timeout
///
/// # Example
///
/// ```no_run
/// use webcrawler::config::InfrastructureOptions;
/// use webcrawler::fetch::build_http_client;
///
/// let client = build_http_client(&InfrastructureOptions::default()).unwrap();
/// ```
pub fn build_http_client(options: &InfrastructureOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(options.user_agent.clone())
        .timeout(options.request_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Why a single attempt failed
enum AttemptFailure {
    Status(reqwest::StatusCode),
    Network(reqwest::Error),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "status {}", status),
            Self::Network(err) => write!(f, "network error: {}", err),
        }
    }
}

/// [`Downloader`] over `reqwest` with a bounded retry policy
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Read body, return content |
/// | Any other status | Retry until attempts run out, then `None` |
/// | Network error / timeout | Retry until attempts run out, then `None` |
/// | Body read failure | Immediate `None` |
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
    policy: RetryPolicy,
}

impl HttpDownloader {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn from_options(options: &InfrastructureOptions) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            build_http_client(options)?,
            RetryPolicy::from_options(options),
        ))
    }

    async fn attempt(&self, uri: &Url) -> Result<Response, AttemptFailure> {
        let response = self
            .client
            .get(uri.clone())
            .send()
            .await
            .map_err(AttemptFailure::Network)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(AttemptFailure::Status(response.status()))
        }
    }

    async fn read_content(uri: &Url, response: Response) -> Option<WebContent> {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        match response.text().await {
            Ok(body) => Some(WebContent { body, content_type }),
            Err(e) => {
                tracing::error!("Failed to read body of {}: {}", uri, e);
                None
            }
        }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, uri: &Url) -> Option<WebContent> {
        let mut attempt = 1;

        loop {
            let failure = match self.attempt(uri).await {
                Ok(response) => return Self::read_content(uri, response).await,
                Err(failure) => failure,
            };

            if !self.policy.should_retry(attempt) {
                tracing::error!(
                    "Failed to download {} after {} attempt(s): {}",
                    uri,
                    attempt,
                    failure
                );
                return None;
            }

            let delay = self.policy.delay_for(attempt);
            tracing::warn!(
                "Request to {} failed with {}. Waiting {:?} before next retry. Retry attempt {}",
                uri,
                failure,
                delay,
                attempt
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
