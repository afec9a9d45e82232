use url::Url;

/// Returns the key under which a URI is de-duplicated
///
/// The key covers scheme, host, port, path and query. The fragment is
/// dropped because it never selects a different document. Hosts are already
/// lowercased by the `url` parser for HTTP(S) URIs, and default ports are
/// elided, so `HTTP://Example.COM:80/a` and `http://example.com/a#top` share a
/// key.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webcrawler::uri::visit_key;
///
/// let a = Url::parse("HTTP://Example.COM:80/a#top").unwrap();
/// let b = Url::parse("http://example.com/a").unwrap();
/// assert_eq!(visit_key(&a), visit_key(&b));
/// ```
pub fn visit_key(uri: &Url) -> String {
    let mut key = uri.clone();
    key.set_fragment(None);
    key.into()
}

/// Returns the path plus `?query` of a URI (no fragment)
pub fn path_and_query(uri: &Url) -> String {
    match uri.query() {
        Some(query) => format!("{}?{}", uri.path(), query),
        None => uri.path().to_string(),
    }
}

/// Returns the "directory" of a page: its last path segment stripped and
/// its query and fragment dropped
///
/// `http://a.com/docs/page?x=1` becomes `http://a.com/docs/`, and a page
/// with at most one segment resolves to the site root.
pub fn parent_directory(uri: &Url) -> Url {
    let mut base = uri.clone();
    base.set_query(None);
    base.set_fragment(None);

    let path = uri.path();
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    let directory = match trimmed.rfind('/') {
        Some(idx) => &trimmed[..=idx],
        None => "/",
    };
    base.set_path(directory);

    base
}
