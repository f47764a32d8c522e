use chrono::{DateTime, Utc};
use shared::dto::{ToolPayload, ToolRecord, ToolSummary};
use shared::normalize::{
    normalize_array_field, normalize_array_value, normalize_score_value, normalize_text,
};
use sqlx::FromRow;
use thiserror::Error;

/// A `developer_tools` row as stored. List columns hold JSON array text, but
/// older rows may still carry comma-separated text.
#[derive(Debug, Clone, FromRow)]
pub struct ToolRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub frameworks: Option<String>,
    pub supported_languages: Option<String>,
    pub features: Option<String>,
    pub native_integrations: Option<String>,
    pub verified_integrations: Option<String>,
    pub notable_strengths: Option<String>,
    pub known_limitations: Option<String>,
    pub maturity_score: Option<i64>,
    pub popularity_score: Option<i64>,
    pub pricing: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
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

impl From<ToolRow> for Tool {
    fn from(row: ToolRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            description: row.description,
            url: row.url,
            frameworks: normalize_array_field(row.frameworks.as_deref()),
            supported_languages: normalize_array_field(row.supported_languages.as_deref()),
            features: normalize_array_field(row.features.as_deref()),
            native_integrations: normalize_array_field(row.native_integrations.as_deref()),
            verified_integrations: normalize_array_field(row.verified_integrations.as_deref()),
            notable_strengths: normalize_array_field(row.notable_strengths.as_deref()),
            known_limitations: normalize_array_field(row.known_limitations.as_deref()),
            maturity_score: row.maturity_score,
            popularity_score: row.popularity_score,
            pricing: row.pricing,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Tool {
    pub fn into_record(self) -> ToolRecord {
        ToolRecord {
            id: self.id,
            name: self.name,
            category: self.category,
            description: self.description,
            url: self.url,
            frameworks: self.frameworks,
            supported_languages: self.supported_languages,
            features: self.features,
            native_integrations: self.native_integrations,
            verified_integrations: self.verified_integrations,
            notable_strengths: self.notable_strengths,
            known_limitations: self.known_limitations,
            maturity_score: self.maturity_score,
            popularity_score: self.popularity_score,
            pricing: self.pricing,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn into_summary(self) -> ToolSummary {
        ToolSummary {
            id: self.id,
            name: self.name,
            category: self.category,
            description: self.description,
            url: self.url,
            maturity_score: self.maturity_score,
            popularity_score: self.popularity_score,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0} cannot be empty")]
pub struct BlankField(pub &'static str);

/// Normalized, possibly partial set of tool fields.
///
/// `None` means the field was not supplied. For nullable columns the inner
/// `Option` carries an explicit clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolDraft {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub pricing: Option<Option<String>>,
    pub frameworks: Option<Vec<String>>,
    pub supported_languages: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub native_integrations: Option<Vec<String>>,
    pub verified_integrations: Option<Vec<String>>,
    pub notable_strengths: Option<Vec<String>>,
    pub known_limitations: Option<Vec<String>>,
    pub maturity_score: Option<Option<i64>>,
    pub popularity_score: Option<Option<i64>>,
}

impl ToolDraft {
    /// Builds a draft from a request body. `name` and `category` may be
    /// omitted, but not sent as null or blank.
    pub fn from_payload(payload: &ToolPayload) -> Result<Self, BlankField> {
        Ok(Self {
            name: required_text("name", &payload.name)?,
            category: required_text("category", &payload.category)?,
            description: optional_text(&payload.description),
            url: optional_text(&payload.url),
            pricing: optional_text(&payload.pricing),
            frameworks: payload.frameworks.as_ref().map(normalize_array_value),
            supported_languages: payload.supported_languages.as_ref().map(normalize_array_value),
            features: payload.features.as_ref().map(normalize_array_value),
            native_integrations: payload.native_integrations.as_ref().map(normalize_array_value),
            verified_integrations: payload
                .verified_integrations
                .as_ref()
                .map(normalize_array_value),
            notable_strengths: payload.notable_strengths.as_ref().map(normalize_array_value),
            known_limitations: payload.known_limitations.as_ref().map(normalize_array_value),
            maturity_score: payload.maturity_score.as_ref().map(normalize_score_value),
            popularity_score: payload.popularity_score.as_ref().map(normalize_score_value),
        })
    }
}

fn required_text(
    field: &'static str,
    value: &Option<Option<String>>,
) -> Result<Option<String>, BlankField> {
    match value {
        None => Ok(None),
        Some(text) => normalize_text(text.as_deref())
            .map(Some)
            .ok_or(BlankField(field)),
    }
}

fn optional_text(value: &Option<Option<String>>) -> Option<Option<String>> {
    value.as_ref().map(|text| normalize_text(text.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> ToolPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unspecified_fields_stay_absent() {
        let draft = ToolDraft::from_payload(&payload(json!({ "name": " Cody " }))).unwrap();

        assert_eq!(draft.name.as_deref(), Some("Cody"));
        assert_eq!(draft.category, None);
        assert_eq!(draft.description, None);
        assert_eq!(draft.frameworks, None);
        assert_eq!(draft.maturity_score, None);
    }

    #[test]
    fn test_fields_are_normalized() {
        let draft = ToolDraft::from_payload(&payload(json!({
            "name": "Cursor",
            "category": "AI Code Editor",
            "description": "",
            "frameworks": "React, Vue",
            "features": ["Chat", " "],
            "knownLimitations": "Not specified",
            "maturityScore": 12,
            "popularityScore": "9"
        })))
        .unwrap();

        assert_eq!(draft.description, Some(None));
        assert_eq!(draft.frameworks, Some(vec!["React".into(), "Vue".into()]));
        assert_eq!(draft.features, Some(vec!["Chat".into()]));
        assert_eq!(draft.known_limitations, Some(vec![]));
        assert_eq!(draft.maturity_score, Some(None));
        assert_eq!(draft.popularity_score, Some(Some(9)));
    }

    #[test]
    fn test_blank_required_fields_are_rejected() {
        assert_eq!(
            ToolDraft::from_payload(&payload(json!({ "name": null }))),
            Err(BlankField("name"))
        );
        assert_eq!(
            ToolDraft::from_payload(&payload(json!({ "name": "x", "category": "  " }))),
            Err(BlankField("category"))
        );
    }

    #[test]
    fn test_row_with_legacy_text_maps_to_arrays() {
        let now = Utc::now();
        let row = ToolRow {
            id: 1,
            name: "AI2sql".into(),
            category: "SQL Generator".into(),
            description: None,
            url: None,
            frameworks: Some("Django, Rails".into()),
            supported_languages: None,
            features: Some(r#"["Text to SQL"]"#.into()),
            native_integrations: Some("Not specified".into()),
            verified_integrations: Some("[broken".into()),
            notable_strengths: Some("[]".into()),
            known_limitations: None,
            maturity_score: Some(6),
            popularity_score: None,
            pricing: None,
            created_at: now,
            updated_at: now,
        };

        let record = Tool::from(row).into_record();
        assert_eq!(record.frameworks, vec!["Django", "Rails"]);
        assert!(record.supported_languages.is_empty());
        assert_eq!(record.features, vec!["Text to SQL"]);
        assert!(record.native_integrations.is_empty());
        assert!(record.verified_integrations.is_empty());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["knownLimitations"], json!([]));
        assert_eq!(value["popularityScore"], serde_json::Value::Null);
    }
}
