//! Error taxonomy for handoff.
//!
//! Every failure in this workspace is either fatal and raised through
//! [`HandoffError`], or tolerated silently (unrecognized head elements).
//! Nothing here retries.

use thiserror::Error;

/// Result alias used across the core and runtime crates.
pub type HandoffResult<T> = Result<T, HandoffError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandoffError {
    /// No usable associated domain, or the base URL could not be resolved.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A navigation hook was used outside of its root navigation provider.
    #[error("context error: {0}")]
    Context(String),

    /// A URL that must be absolute (http or https) is not.
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl HandoffError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn context(msg: impl Into<String>) -> Self {
        Self::Context(msg.into())
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// True for configuration failures (the only errors descriptor building raises on its own).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
