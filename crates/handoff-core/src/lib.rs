//! handoff-core
//!
//! Core primitives for handoff:
//! - Associated-domain resolution and the shared web origin
//! - Canonical webpage URLs, derived ids and default titles
//! - Head metadata extraction with last-declaration-wins precedence
//! - Activity descriptor model and builder
//!
//! The core does no I/O and holds no global state. Hosts build an
//! [`OriginCell`](domain::OriginCell) once and pass it (or a
//! [`DescriptorBuilder`](builder::DescriptorBuilder)) to the components that
//! need it.

pub mod builder;
pub mod canonical;
pub mod config;
pub mod domain;
pub mod errors;
pub mod metadata;
pub mod model;

pub use crate::errors::{HandoffError, HandoffResult};

/// Activity type tags understood by the native side.
pub mod activities {
    /// An indexed in-app route.
    pub const INDEXED_ROUTE: &str = "handoff.indexed-route";
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::builder::DescriptorBuilder;
    pub use crate::canonical::{app_link, derive_id, last_path_segment, resolve_webpage_url};
    pub use crate::config::{validate_config, HandoffConfig};
    pub use crate::domain::{web_domains, OriginCell, WebOrigin};
    pub use crate::metadata::{extract_metadata, ExtractedMetadata, HeadNode, MetaContent, MetaElement};
    pub use crate::model::ActivityDescriptor;
    pub use crate::{HandoffError, HandoffResult};
}
