//! Associated-domain resolution.
//!
//! The app configuration declares the web domains the application may
//! represent (`applinks:example.com`, `webcredentials:...`, ...). Only the
//! `applinks:` entries name a public web origin, and entries carrying a
//! `?mode=developer` / `?mode=managed` suffix are preview domains that must
//! never become the canonical base URL.
//!
//! Resolution is deterministic: the first qualifying entry in declaration
//! order wins, and any further candidates are reported with a warning.
//!
//! There is no process-global slot. [`OriginCell`] is the single holder of the
//! resolved origin; hosts create one at startup and share it explicitly.

use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::errors::{HandoffError, HandoffResult};

/// Capability marker for web association entries.
pub const APPLINKS_MARKER: &str = "applinks:";

/// Build-mode suffixes that mark non-production preview domains.
const MODE_SUFFIXES: [&str; 4] = [
    "?mode=developer",
    "?mode=managed",
    "?mode=developer+managed",
    "?mode=managed+developer",
];

/// Extract the usable web domains from raw associated-domain declarations.
///
/// Keeps only `applinks:` entries, strips the marker and one trailing slash,
/// and drops entries with a build-mode suffix. Order is preserved.
pub fn web_domains<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| entry.as_ref().strip_prefix(APPLINKS_MARKER))
        .map(|domain| domain.strip_suffix('/').unwrap_or(domain))
        .filter(|domain| !is_mode_suffixed(domain))
        .map(strip_scheme)
        .collect()
}

fn is_mode_suffixed(domain: &str) -> bool {
    MODE_SUFFIXES.iter().any(|suffix| domain.ends_with(suffix))
}

/// Associated domains are bare hosts. A scheme here is a config mistake; we
/// warn and drop it rather than build `https://https://...`.
fn strip_scheme(domain: &str) -> String {
    for scheme in ["https://", "http://"] {
        if let Some(rest) = domain.strip_prefix(scheme) {
            warn!(
                domain,
                "associated domain should not include a scheme; using `{rest}`"
            );
            return rest.to_string();
        }
    }
    domain.to_string()
}

/// One authoritative web origin, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebOrigin(String);

impl WebOrigin {
    /// Resolve the origin from raw associated-domain declarations.
    ///
    /// Fails with [`HandoffError::Configuration`] when no usable domain remains.
    pub fn from_associated_domains<S: AsRef<str>>(entries: &[S]) -> HandoffResult<Self> {
        let domains = web_domains(entries);

        let Some((selected, discarded)) = domains.split_first() else {
            return Err(HandoffError::configuration(
                "no web URL found in the associated domains; add an `applinks:` entry for the site that hosts this app",
            ));
        };

        if !discarded.is_empty() {
            warn!(
                selected = %selected,
                discarded = ?discarded,
                "multiple web URLs found in associated domains; using the first one"
            );
        }

        let origin = format!("https://{}", selected.strip_suffix('/').unwrap_or(selected));
        debug!(origin = %origin, "resolved web origin from associated domains");
        Ok(Self(origin))
    }

    /// Accept an explicit base URL (override API).
    ///
    /// The URL must be absolute http(s); a trailing slash is dropped.
    pub fn parse(input: &str) -> HandoffResult<Self> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

        let parsed =
            Url::parse(trimmed).map_err(|e| HandoffError::invalid_url(input, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HandoffError::invalid_url(input, "scheme must be http or https"));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(HandoffError::invalid_url(input, "missing host"));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host part of the origin, if it parses.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.0)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    /// Append an in-app path to the origin.
    pub fn join(&self, href: &str) -> String {
        if href.is_empty() || href.starts_with('/') {
            format!("{}{}", self.0, href)
        } else {
            format!("{}/{}", self.0, href)
        }
    }
}

impl fmt::Display for WebOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holder for the resolved origin.
///
/// The first call to [`OriginCell::get_or_resolve`] resolves from the declared
/// domains and caches the result. An override replaces it; `reset` clears it
/// so the next read resolves again. Failed resolutions are not cached.
#[derive(Debug, Default)]
pub struct OriginCell {
    domains: Vec<String>,
    slot: RwLock<Option<WebOrigin>>,
}

impl OriginCell {
    pub fn new(domains: Vec<String>) -> Self {
        Self {
            domains,
            slot: RwLock::new(None),
        }
    }

    /// Cell whose value is already fixed (no declared domains to fall back on).
    pub fn with_origin(origin: WebOrigin) -> Self {
        Self {
            domains: Vec::new(),
            slot: RwLock::new(Some(origin)),
        }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// The cached origin, without triggering resolution.
    pub fn current(&self) -> Option<WebOrigin> {
        self.slot.read().clone()
    }

    pub fn get_or_resolve(&self) -> HandoffResult<WebOrigin> {
        if let Some(origin) = self.slot.read().as_ref() {
            return Ok(origin.clone());
        }

        let mut slot = self.slot.write();
        if let Some(origin) = slot.as_ref() {
            return Ok(origin.clone());
        }
        let origin = WebOrigin::from_associated_domains(&self.domains)?;
        *slot = Some(origin.clone());
        Ok(origin)
    }

    /// Override the resolved origin with wherever the site is actually hosted.
    pub fn set_override(&self, url: &str) -> HandoffResult<WebOrigin> {
        let origin = WebOrigin::parse(url)?;
        debug!(origin = %origin, "web origin overridden");
        *self.slot.write() = Some(origin.clone());
        Ok(origin)
    }

    pub fn reset(&self) {
        *self.slot.write() = None;
    }
}
