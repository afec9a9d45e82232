use crate::fetch::cache::ContentCache;
use crate::fetch::client::Downloader;
use crate::fetch::WebContent;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builds the cache key for a URI
pub fn cache_key(uri: &Url) -> String {
    format!("WebPage_{}", uri.as_str())
}

/// Read-through cache in front of a [`Downloader`]
///
/// A hit is served without touching the network. A miss downloads, stores
/// successful content with the configured TTL, and returns it. Failed
/// downloads are never cached.
#[derive(Clone)]
pub struct ContentRepository {
    downloader: Arc<dyn Downloader>,
    cache: Arc<dyn ContentCache>,
    ttl: Duration,
}

impl ContentRepository {
    pub fn new(downloader: Arc<dyn Downloader>, cache: Arc<dyn ContentCache>, ttl: Duration) -> Self {
        Self {
            downloader,
            cache,
            ttl,
        }
    }

    pub async fn get_content(&self, uri: &Url) -> Option<WebContent> {
        if uri.scheme() != "http" && uri.scheme() != "https" {
            tracing::debug!("Refusing to fetch non-HTTP URI {}", uri);
            return None;
        }

        let key = cache_key(uri);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!("Cache hit for {}", uri);
            return Some(cached);
        }

        let content = self.downloader.download(uri).await?;
        self.cache.set(&key, content.clone(), self.ttl);

        Some(content)
    }
}

impl std::fmt::Debug for ContentRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRepository")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
