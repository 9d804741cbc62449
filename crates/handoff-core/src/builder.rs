//! Activity descriptor construction.
//!
//! Merge order:
//! 1. defaults: title from the last path segment, canonical webpage URL,
//!    searchable, keywords = `[title]`
//! 2. extracted metadata replaces any field it declared (keywords are
//!    replaced wholesale, never unioned)
//! 3. augmentation that metadata cannot override: the application name is
//!    appended to the keywords and `userInfo.href` is set to the deep link
//!    (host-level images and thumbnail come from the builder, not the head)
//! 4. `id` is derived from the final webpage URL unless one was given

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use crate::activities;
use crate::canonical::{app_link, derive_id, last_path_segment, resolve_webpage_url};
use crate::config::{validate_config, HandoffConfig};
use crate::domain::OriginCell;
use crate::errors::HandoffResult;
use crate::metadata::{extract_metadata, ExtractedMetadata, HeadNode};
use crate::model::{validate_absolute_url, ActivityDescriptor, USER_INFO_HREF};

#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    origin: Arc<OriginCell>,
    application_name: Option<String>,
    scheme: Option<String>,
    activity_type: String,
    image_url: Option<String>,
    thumbnail_url: Option<String>,
}

impl DescriptorBuilder {
    pub fn new(origin: Arc<OriginCell>) -> Self {
        Self {
            origin,
            application_name: None,
            scheme: None,
            activity_type: activities::INDEXED_ROUTE.to_string(),
            image_url: None,
            thumbnail_url: None,
        }
    }

    /// Validate `cfg` and build from it, applying any base URL override.
    pub fn from_config(cfg: &HandoffConfig) -> HandoffResult<Self> {
        validate_config(cfg)?;
        Ok(Self::new(Arc::new(cfg.origin_cell()?))
            .application_name(cfg.application_name.clone())
            .scheme(cfg.scheme.clone()))
    }

    pub fn application_name(mut self, name: Option<String>) -> Self {
        self.application_name = name.filter(|n| !n.is_empty());
        self
    }

    pub fn scheme(mut self, scheme: Option<String>) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn activity_type(mut self, activity_type: impl Into<String>) -> Self {
        self.activity_type = activity_type.into();
        self
    }

    /// Local image file attached to every descriptor this builder produces.
    pub fn image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn thumbnail_url(mut self, thumbnail_url: Option<String>) -> Self {
        self.thumbnail_url = thumbnail_url;
        self
    }

    pub fn origin(&self) -> &Arc<OriginCell> {
        &self.origin
    }

    /// Descriptor for `href` with the screen's head nodes.
    pub fn build(&self, href: &str, nodes: &[HeadNode]) -> HandoffResult<ActivityDescriptor> {
        self.build_from(href, extract_metadata(nodes))
    }

    pub fn build_from(
        &self,
        href: &str,
        meta: ExtractedMetadata,
    ) -> HandoffResult<ActivityDescriptor> {
        // Resolved even when `og:url` is declared: a missing origin is a config bug.
        let canonical_url = resolve_webpage_url(&self.origin, href)?;

        let title = meta.title.unwrap_or_else(|| last_path_segment(href));

        let mut keywords = meta.keywords.unwrap_or_else(|| vec![title.clone()]);
        if let Some(name) = &self.application_name {
            keywords.push(name.clone());
        }

        let webpage_url = match meta.webpage_url {
            Some(declared) => {
                let url = validate_absolute_url(&declared)?;
                let origin_host = self.origin.current().and_then(|o| o.host());
                if origin_host.is_some() && url.host_str() != origin_host.as_deref() {
                    warn!(
                        declared = %declared,
                        canonical = %canonical_url,
                        "declared og:url is outside the resolved web origin"
                    );
                }
                declared
            }
            None => canonical_url,
        };

        let id = meta.id.unwrap_or_else(|| derive_id(&webpage_url));

        Ok(ActivityDescriptor {
            id,
            activity_type: self.activity_type.clone(),
            title,
            description: meta.description,
            keywords,
            webpage_url,
            image_url: self.image_url.clone(),
            dark_image_url: meta.dark_image_url,
            thumbnail_url: self.thumbnail_url.clone(),
            phrase: meta.phrase,
            user_info: BTreeMap::from([(
                USER_INFO_HREF.to_string(),
                app_link(self.scheme.as_deref(), href),
            )]),
            eligible_for_search: true,
            date_modified: None,
            expiration_date: None,
        })
    }
}
