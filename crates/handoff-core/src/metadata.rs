//! Head metadata extraction.
//!
//! A screen declares its metadata with head-like elements (`<title>`,
//! `<meta>`). Front-ends hand them over as [`HeadNode`] values in document
//! order; [`extract_metadata`] folds them into an [`ExtractedMetadata`] where
//! a later declaration of the same field replaces an earlier one.
//!
//! Mapping:
//! - `title` element, `og:title`, `name="title"` -> `title`
//! - `og:description`, `name="description"` -> `description`
//! - `og:url`, `name="url"` -> `webpage_url`
//! - `og:image` -> `dark_image_url` (every image, whatever its `media`)
//! - `name="keywords"` -> `keywords` (list, or comma-delimited string)
//! - `expo:spoken-phrase` -> `phrase`
//!
//! Anything else is ignored so newer front-ends can emit elements this
//! version does not know about.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One child of a screen's head declaration.
///
/// Deserialization never fails on a well-formed JSON value: text children,
/// unknown element types and attributes of the wrong shape all degrade to
/// [`HeadNode::Other`] or an absent attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HeadNode {
    Title(TitleElement),
    Meta(MetaElement),
    /// Text, fragments and elements of unknown type.
    Other,
}

impl<'de> Deserialize<'de> for HeadNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|v| Self::from_value(&v))
    }
}

impl HeadNode {
    /// Lenient conversion from a front-end's JSON element.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(attrs) = value else {
            return Self::Other;
        };

        match attrs.get("type").and_then(Value::as_str) {
            Some("title") => Self::Title(TitleElement {
                children: attrs.get("children").map(child_text).unwrap_or_default(),
            }),
            Some("meta") => Self::Meta(MetaElement {
                property: string_attr(attrs, "property"),
                name: string_attr(attrs, "name"),
                content: attrs.get("content").and_then(MetaContent::from_value),
                media: string_attr(attrs, "media"),
            }),
            _ => Self::Other,
        }
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::Title(TitleElement {
            children: text.into(),
        })
    }

    pub fn meta_name(name: impl Into<String>, content: impl Into<MetaContent>) -> Self {
        Self::Meta(MetaElement {
            name: Some(name.into()),
            content: Some(content.into()),
            ..MetaElement::default()
        })
    }

    pub fn meta_property(property: impl Into<String>, content: impl Into<MetaContent>) -> Self {
        Self::Meta(MetaElement {
            property: Some(property.into()),
            content: Some(content.into()),
            ..MetaElement::default()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleElement {
    /// Literal child text.
    #[serde(default)]
    pub children: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MetaContent>,
    /// Media query hint, e.g. `(prefers-color-scheme: dark)`. Not used for routing yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

impl MetaElement {
    fn is(&self, property: &str, name: &str) -> bool {
        self.property.as_deref() == Some(property) || self.name.as_deref() == Some(name)
    }
}

/// `content` attribute: a plain string or an already-structured list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaContent {
    Text(String),
    List(Vec<String>),
}

impl MetaContent {
    /// Strings and numbers become text; lists keep their scalar items.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => Some(Self::Text(n.to_string())),
            Value::Array(items) => Some(Self::List(items.iter().filter_map(scalar_text).collect())),
            _ => None,
        }
    }

    /// Scalar view; list values are joined with commas.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(","),
        }
    }

    /// List view; strings are split on commas, lists pass through unchanged.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Self::Text(s) => s
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
            Self::List(items) => items.clone(),
        }
    }
}

fn string_attr(attrs: &Map<String, Value>, key: &str) -> Option<String> {
    attrs.get(key).and_then(Value::as_str).map(str::to_string)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `<title>Post {n}</title>` arrives as `["Post ", 1]`; concatenate the scalars.
fn child_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).unwrap_or_default(),
    }
}

impl From<&str> for MetaContent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetaContent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for MetaContent {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for MetaContent {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Fields a screen set explicitly. `None` means "not declared".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMetadata {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub webpage_url: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub dark_image_url: Option<String>,
    pub phrase: Option<String>,
}

impl ExtractedMetadata {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fold head nodes into metadata, later declarations winning.
pub fn extract_metadata(nodes: &[HeadNode]) -> ExtractedMetadata {
    let mut out = ExtractedMetadata::default();
    for node in nodes {
        match node {
            HeadNode::Title(title) => out.title = Some(title.children.clone()),
            HeadNode::Meta(meta) => apply_meta(&mut out, meta),
            HeadNode::Other => {}
        }
    }
    out
}

fn apply_meta(out: &mut ExtractedMetadata, meta: &MetaElement) {
    // A meta without content declares nothing.
    let Some(content) = meta.content.as_ref() else {
        return;
    };

    if meta.is("og:title", "title") {
        out.title = Some(content.to_text());
    }
    if meta.is("og:description", "description") {
        out.description = Some(content.to_text());
    }
    if meta.is("og:url", "url") {
        out.webpage_url = Some(content.to_text());
    }
    // TODO: route `media="(prefers-color-scheme: light)"` to a light image once the
    // native side distinguishes light and dark thumbnails.
    if meta.property.as_deref() == Some("og:image") {
        out.dark_image_url = Some(content.to_text());
    }
    if meta.property.as_deref() == Some("expo:spoken-phrase") {
        out.phrase = Some(content.to_text());
    }
    if meta.name.as_deref() == Some("keywords") {
        out.keywords = Some(content.to_list());
    }
}
