//! Job-wide set of URIs already admitted for crawling

use crate::uri::visit_key;
use dashmap::DashSet;
use url::Url;

/// Concurrent set of visit keys
///
/// [`VisitedSet::admit`] is the single check-and-insert used for every seed
/// and every discovered link, so a URI is queued at most once per job no
/// matter how many workers discover it at the same time.
#[derive(Debug, Default)]
pub struct VisitedSet {
    keys: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `uri`; returns `false` if it was already present
    pub fn admit(&self, uri: &Url) -> bool {
        self.keys.insert(visit_key(uri))
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }
}
