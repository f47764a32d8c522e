use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Full wire representation of a catalog entry. List fields are always
/// present, never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRecord {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub frameworks: Vec<String>,
    pub supported_languages: Vec<String>,
    pub features: Vec<String>,
    pub native_integrations: Vec<String>,
    pub verified_integrations: Vec<String>,
    pub notable_strengths: Vec<String>,
    pub known_limitations: Vec<String>,
    pub maturity_score: Option<i64>,
    pub popularity_score: Option<i64>,
    pub pricing: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Condensed record for list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSummary {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub maturity_score: Option<i64>,
    pub popularity_score: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolView {
    Full(ToolRecord),
    Summary(ToolSummary),
}

/// Inbound create/update body.
///
/// The outer `Option` records whether a key was sent at all, so partial
/// updates can tell "leave alone" from "set to null". List and score fields
/// stay raw JSON because clients send them as arrays, JSON text or
/// comma-separated text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPayload {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub pricing: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub frameworks: Option<Value>,
    #[serde(default, alias = "supported_languages", deserialize_with = "present")]
    pub supported_languages: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub features: Option<Value>,
    #[serde(default, alias = "native_integrations", deserialize_with = "present")]
    pub native_integrations: Option<Value>,
    #[serde(default, alias = "verified_integrations", deserialize_with = "present")]
    pub verified_integrations: Option<Value>,
    #[serde(default, alias = "notable_strengths", deserialize_with = "present")]
    pub notable_strengths: Option<Value>,
    #[serde(default, alias = "known_limitations", deserialize_with = "present")]
    pub known_limitations: Option<Value>,

    #[serde(default, alias = "maturity_score", deserialize_with = "present")]
    pub maturity_score: Option<Value>,
    #[serde(default, alias = "popularity_score", deserialize_with = "present")]
    pub popularity_score: Option<Value>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolView>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolSearchResponse {
    pub tools: Vec<ToolRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_tools: i64,
    pub total_categories: i64,
    pub category_breakdown: BTreeMap<String, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_distinguishes_missing_from_null() {
        let payload: ToolPayload =
            serde_json::from_value(json!({ "description": null, "frameworks": null })).unwrap();

        assert_eq!(payload.name, None);
        assert_eq!(payload.description, Some(None));
        assert_eq!(payload.frameworks, Some(Value::Null));
        assert_eq!(payload.features, None);
    }

    #[test]
    fn test_payload_accepts_snake_case_aliases() {
        let payload: ToolPayload = serde_json::from_value(json!({
            "name": "Cody",
            "supported_languages": ["Rust"],
            "maturity_score": 8
        }))
        .unwrap();

        assert_eq!(payload.name, Some(Some("Cody".to_string())));
        assert_eq!(payload.supported_languages, Some(json!(["Rust"])));
        assert_eq!(payload.maturity_score, Some(json!(8)));
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(1, 5, 12);
        assert_eq!(p.pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);

        let last = Pagination::new(3, 5, 12);
        assert!(!last.has_next);
        assert!(last.has_prev);

        let empty = Pagination::new(1, 20, 0);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = ToolSummary {
            id: 1,
            name: "Cody".into(),
            category: "AI Assistant".into(),
            description: None,
            url: None,
            maturity_score: Some(8),
            popularity_score: None,
        };
        let value = serde_json::to_value(ToolView::Summary(summary)).unwrap();

        assert_eq!(value["maturityScore"], json!(8));
        assert_eq!(value["popularityScore"], Value::Null);
        assert!(value.get("frameworks").is_none());
    }
}
