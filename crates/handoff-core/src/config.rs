//! Configuration for handoff.
//!
//! The core crate does not read files or environment variables. Hosts load
//! their app configuration however they like and hand the resolved values
//! over as a [`HandoffConfig`], or pass the parsed manifest JSON to
//! [`HandoffConfig::from_app_manifest`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{OriginCell, WebOrigin};
use crate::errors::{HandoffError, HandoffResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffConfig {
    /// Raw associated-domain declarations, e.g. `applinks:example.com`.
    #[serde(default)]
    pub associated_domains: Vec<String>,

    /// Display name appended to every descriptor's keywords.
    #[serde(default)]
    pub application_name: Option<String>,

    /// Deep-link scheme used for `userInfo.href`.
    #[serde(default)]
    pub scheme: Option<String>,

    /// Explicit base URL; takes precedence over the associated domains.
    #[serde(default)]
    pub web_url: Option<String>,

    /// Suspend a screen's activity when the screen unmounts.
    #[serde(default)]
    pub suspend_on_unmount: bool,
}

impl HandoffConfig {
    /// Read the fields handoff needs from an app manifest.
    ///
    /// Accepts both the bare manifest and one nested under `expo`:
    /// `name`, `scheme` (string, or first of a list) and `ios.associatedDomains`.
    pub fn from_app_manifest(manifest: &Value) -> HandoffResult<Self> {
        let root = manifest.get("expo").unwrap_or(manifest);
        if !root.is_object() {
            return Err(HandoffError::invalid_argument("app manifest must be a JSON object"));
        }

        let associated_domains = match root.pointer("/ios/associatedDomains") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).ok_or_else(|| {
                        HandoffError::invalid_argument("ios.associatedDomains must contain strings")
                    })
                })
                .collect::<HandoffResult<Vec<_>>>()?,
            Some(_) => {
                return Err(HandoffError::invalid_argument(
                    "ios.associatedDomains must be an array",
                ))
            }
        };

        let scheme = match root.get("scheme") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Array(items)) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
            _ => None,
        };

        Ok(Self {
            associated_domains,
            application_name: root.get("name").and_then(Value::as_str).map(str::to_string),
            scheme,
            web_url: None,
            suspend_on_unmount: false,
        })
    }

    /// Build the origin holder, applying `web_url` if set.
    pub fn origin_cell(&self) -> HandoffResult<OriginCell> {
        let cell = OriginCell::new(self.associated_domains.clone());
        if let Some(url) = self.web_url.as_deref() {
            cell.set_override(url)?;
        }
        Ok(cell)
    }
}

/// Validate a configuration object.
pub fn validate_config(cfg: &HandoffConfig) -> HandoffResult<()> {
    if let Some(url) = cfg.web_url.as_deref() {
        WebOrigin::parse(url)?;
    }

    if let Some(scheme) = cfg.scheme.as_deref() {
        if scheme.trim().is_empty() {
            return Err(HandoffError::invalid_argument("scheme must not be empty"));
        }
    }

    Ok(())
}
