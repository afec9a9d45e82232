use crate::content::parser::HtmlParser;
use crate::uri::{validate_link, visit_key};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Produces the set of admissible child URIs on a page
///
/// Raw hrefs come from the [`HtmlParser`] collaborator; each one is run
/// through [`validate_link`] and the survivors are collapsed by visit key,
/// so two spellings of the same target yield one entry. The returned vector
/// keeps first-seen order, but callers must treat it as a set.
#[derive(Clone)]
pub struct LinkExtractor {
    parser: Arc<dyn HtmlParser>,
}

impl LinkExtractor {
    pub fn new(parser: Arc<dyn HtmlParser>) -> Self {
        Self { parser }
    }

    pub fn extract(&self, page_body: &str, parent: &Url) -> Vec<Url> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for raw in self.parser.links(page_body) {
            let uri = match validate_link(&raw, parent) {
                Ok(uri) => uri,
                Err(rejection) => {
                    tracing::debug!("Skipping link on {}: {}", parent, rejection);
                    continue;
                }
            };

            if seen.insert(visit_key(&uri)) {
                links.push(uri);
            } else {
                tracing::debug!("Skipping duplicate link: {}", uri);
            }
        }

        links
    }
}

impl std::fmt::Debug for LinkExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkExtractor").finish_non_exhaustive()
    }
}
