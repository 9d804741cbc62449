//! Activity descriptor model.
//!
//! [`ActivityDescriptor`] is the record handed to the OS discoverability
//! capability. Field names serialize to the camelCase keys the native bridge
//! reads (`webpageURL`, `activityType`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;

use crate::canonical::ID_SEPARATOR;
use crate::errors::{HandoffError, HandoffResult};

/// Key in `user_info` holding the app-internal deep link of the route.
pub const USER_INFO_HREF: &str = "href";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDescriptor {
    pub id: String,
    pub activity_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(rename = "webpageURL")]
    pub webpage_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_image_url: Option<String>,
    #[serde(
        rename = "thumbnailURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail_url: Option<String>,
    /// Suggested invocation phrase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrase: Option<String>,
    #[serde(default)]
    pub user_info: BTreeMap<String, String>,
    pub eligible_for_search: bool,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_modified: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<OffsetDateTime>,
}

impl ActivityDescriptor {
    /// App-internal deep link of the route this descriptor represents.
    pub fn href(&self) -> Option<&str> {
        self.user_info.get(USER_INFO_HREF).map(String::as_str)
    }

    /// Check structural invariants before registration.
    pub fn validate(&self) -> HandoffResult<()> {
        if self.id.is_empty() {
            return Err(HandoffError::invalid_argument("activity id must not be empty"));
        }
        if self.activity_type.is_empty() {
            return Err(HandoffError::invalid_argument(
                "activity type must not be empty",
            ));
        }
        validate_absolute_url(&self.webpage_url)?;
        if self.href().is_none() {
            return Err(HandoffError::invalid_argument(format!(
                "user info must contain `{USER_INFO_HREF}`"
            )));
        }
        Ok(())
    }

    /// True when `id` only uses characters a derived id can contain.
    pub fn has_derived_id_shape(&self) -> bool {
        self.id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ID_SEPARATOR)
    }
}

/// Absolute http(s) URL with a host.
pub fn validate_absolute_url(input: &str) -> HandoffResult<Url> {
    if input.is_empty() {
        return Err(HandoffError::invalid_url(input, "must not be empty"));
    }
    let url = Url::parse(input).map_err(|e| HandoffError::invalid_url(input, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(HandoffError::invalid_url(input, "must be an absolute http(s) URL"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample() -> ActivityDescriptor {
        ActivityDescriptor {
            id: "https---example-com-foo".into(),
            activity_type: crate::activities::INDEXED_ROUTE.into(),
            title: "foo".into(),
            description: None,
            keywords: vec!["foo".into()],
            webpage_url: "https://example.com/foo".into(),
            image_url: None,
            dark_image_url: None,
            thumbnail_url: None,
            phrase: None,
            user_info: BTreeMap::from([(USER_INFO_HREF.to_string(), "myapp://foo".to_string())]),
            eligible_for_search: true,
            date_modified: None,
            expiration_date: None,
        }
    }

    #[test]
    fn serializes_native_field_names() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["webpageURL"], "https://example.com/foo");
        assert_eq!(v["activityType"], crate::activities::INDEXED_ROUTE);
        assert_eq!(v["eligibleForSearch"], true);
        assert_eq!(v["userInfo"]["href"], "myapp://foo");
        assert!(v.get("description").is_none());
        assert!(v.get("dateModified").is_none());
    }

    #[test]
    fn dates_use_rfc3339() {
        let mut d = sample();
        d.date_modified = Some(OffsetDateTime::UNIX_EPOCH);
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["dateModified"], "1970-01-01T00:00:00Z");

        let back: ActivityDescriptor = serde_json::from_value(v).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn validate_rejects_relative_url_and_missing_href() {
        assert!(sample().validate().is_ok());

        let mut d = sample();
        d.webpage_url = "/foo".into();
        assert_matches!(d.validate(), Err(HandoffError::InvalidUrl { .. }));

        let mut d = sample();
        d.user_info.clear();
        assert_matches!(d.validate(), Err(HandoffError::InvalidArgument(_)));
    }
}
