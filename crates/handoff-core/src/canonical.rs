//! Canonical URL and identifier derivation.
//!
//! Rules:
//! - the webpage URL is the resolved origin followed by the in-app path
//! - ids are the webpage URL with every non `[A-Za-z0-9]` character replaced
//!   by [`ID_SEPARATOR`]
//! - the default title is the last non-empty path segment, without query
//!   string or extension
//!
//! `derive_id` is not injective: `https://a.com/b-c` and `https://a.com/b/c`
//! map to the same id. Callers that need distinct ids for such routes must
//! supply an explicit id.

use crate::domain::OriginCell;
use crate::errors::HandoffResult;

/// Replacement for characters outside `[A-Za-z0-9]` in derived ids.
pub const ID_SEPARATOR: char = '-';

/// Absolute webpage URL for an in-app path. Resolves the origin on first use.
pub fn resolve_webpage_url(origin: &OriginCell, href: &str) -> HandoffResult<String> {
    Ok(origin.get_or_resolve()?.join(href))
}

/// Stable identifier for a webpage URL.
pub fn derive_id(url: &str) -> String {
    url.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ID_SEPARATOR })
        .collect()
}

/// Final path component with query string and extension removed.
///
/// `"/a/b/photo.jpg?x=1"` gives `"photo"`; a path with no segments gives `""`.
pub fn last_path_segment(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segment = path
        .split('/')
        .rev()
        .find(|s| !s.is_empty())
        .unwrap_or_default();

    match segment.rfind('.') {
        Some(dot) if dot + 1 < segment.len() => segment[..dot].to_string(),
        _ => segment.to_string(),
    }
}

/// App-internal deep link for an in-app path.
///
/// With a scheme `myapp`, `/blog/post-1` becomes `myapp://blog/post-1`.
/// Without one, the in-app path itself is the deep link.
pub fn app_link(scheme: Option<&str>, href: &str) -> String {
    match scheme.map(|s| s.trim_end_matches("://")) {
        Some(scheme) if !scheme.is_empty() => {
            format!("{scheme}://{}", href.trim_start_matches('/'))
        }
        _ => href.to_string(),
    }
}
