//! Typed values stored in popup tables
//!
//! JSON columns are modelled as concrete types so the rest of the code never
//! handles raw blobs, while the wire format stays plain JSON.

use sea_orm::{DeriveActiveEnum, EnumIter, FromJsonQueryResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;
use utoipa::ToSchema;

/// Device class an analytics event was recorded on.
/// NOTE: Use db_type = "Text" for SQLite compatibility.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[sea_orm(string_value = "desktop")]
    Desktop,
    #[sea_orm(string_value = "mobile")]
    Mobile,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Some(DeviceType::Desktop),
            "mobile" => Some(DeviceType::Mobile),
            _ => None,
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Content of a popup variant: an arbitrary JSON object
/// (e.g. `{"text": "Hi", "cta": "Subscribe"}`).
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromJsonQueryResult,
)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct PopupContent(pub Map<String, Value>);

impl PopupContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor used when content arrives as a `serde_json::Value`.
    /// Returns `None` unless the value is a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Exact page URLs on which a scheduled variant may be displayed
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromJsonQueryResult,
)]
#[serde(transparent)]
pub struct DisplayPages(pub Vec<String>);

impl DisplayPages {
    /// Build a list, dropping blank entries and duplicates while keeping order
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for page in pages {
            let page = page.into().trim().to_string();
            if !page.is_empty() && !out.contains(&page) {
                out.push(page);
            }
        }
        Self(out)
    }

    /// Membership test; matching is exact, not prefix or substring
    pub fn contains(&self, page_url: &str) -> bool {
        self.0.iter().any(|p| p == page_url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_device_type_round_trips_as_lowercase() {
        assert_eq!(serde_json::to_value(DeviceType::Mobile).unwrap(), json!("mobile"));
        let parsed: DeviceType = serde_json::from_value(json!("desktop")).unwrap();
        assert_eq!(parsed, DeviceType::Desktop);
        assert!(serde_json::from_value::<DeviceType>(json!("tablet")).is_err());
    }

    #[test]
    fn test_device_type_parse_is_lenient_on_case() {
        assert_eq!(DeviceType::parse(" Desktop "), Some(DeviceType::Desktop));
        assert_eq!(DeviceType::parse("MOBILE"), Some(DeviceType::Mobile));
        assert_eq!(DeviceType::parse("watch"), None);
    }

    #[test]
    fn test_popup_content_is_plain_json_on_the_wire() {
        let content: PopupContent = serde_json::from_value(json!({"text": "Hi"})).unwrap();
        assert_eq!(content.get("text"), Some(&json!("Hi")));
        assert_eq!(serde_json::to_value(&content).unwrap(), json!({"text": "Hi"}));
    }

    #[test]
    fn test_popup_content_rejects_non_objects() {
        assert!(serde_json::from_value::<PopupContent>(json!(["a"])).is_err());
        assert!(PopupContent::from_value(json!("text")).is_none());
        assert!(PopupContent::from_value(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_display_pages_exact_membership() {
        let pages = DisplayPages::new(["/pricing", "/home"]);
        assert!(pages.contains("/pricing"));
        assert!(!pages.contains("/pricing/enterprise"));
        assert!(!pages.contains("/pric"));
    }

    #[test]
    fn test_display_pages_normalizes_entries() {
        let pages = DisplayPages::new([" /home ", "", "/home", "/about"]);
        assert_eq!(pages.iter().collect::<Vec<_>>(), vec!["/home", "/about"]);
        assert_eq!(serde_json::to_value(&pages).unwrap(), json!(["/home", "/about"]));
    }
}
