use crate::extract::ApiQuery;
use crate::handlers::ServiceError;
use crate::state::AppState;
use axum::{extract::State, Json};
use database::SearchCriteria;
use serde::Deserialize;
use shared::dto::ToolSearchResponse;

/// Advanced search parameters. Numeric minimums are parsed leniently: a value
/// that is not a positive integer is ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "min_maturity")]
    pub min_maturity: Option<String>,
    #[serde(alias = "min_popularity")]
    pub min_popularity: Option<String>,
    pub frameworks: Option<String>,
    pub languages: Option<String>,
}

impl From<SearchQuery> for SearchCriteria {
    fn from(query: SearchQuery) -> Self {
        Self {
            text: query.q,
            category: query.category,
            min_maturity: positive_int(query.min_maturity.as_deref()),
            min_popularity: positive_int(query.min_popularity.as_deref()),
            frameworks: split_list(query.frameworks.as_deref()),
            languages: split_list(query.languages.as_deref()),
        }
    }
}

pub async fn search_tools(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> Result<Json<ToolSearchResponse>, ServiceError> {
    let criteria = SearchCriteria::from(params);
    let tools: Vec<_> = state
        .tools
        .search(&criteria)
        .await?
        .into_iter()
        .map(|tool| tool.into_record())
        .collect();

    Ok(Json(ToolSearchResponse {
        count: tools.len(),
        tools,
    }))
}

fn positive_int(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse::<i64>().ok().filter(|n| *n > 0)
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_criteria() {
        let criteria = SearchCriteria::from(SearchQuery {
            q: Some("AI".into()),
            min_maturity: Some("7".into()),
            min_popularity: Some("lots".into()),
            frameworks: Some("React, ,Vue,".into()),
            ..Default::default()
        });

        assert_eq!(criteria.text.as_deref(), Some("AI"));
        assert_eq!(criteria.min_maturity, Some(7));
        assert_eq!(criteria.min_popularity, None);
        assert_eq!(criteria.frameworks, vec!["React", "Vue"]);
        assert!(criteria.languages.is_empty());
    }

    #[test]
    fn test_zero_minimum_is_ignored() {
        assert_eq!(positive_int(Some("0")), None);
        assert_eq!(positive_int(Some(" 3 ")), Some(3));
        assert_eq!(positive_int(None), None);
    }
}
