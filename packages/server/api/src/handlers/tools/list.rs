use crate::extract::ApiQuery;
use crate::handlers::ServiceError;
use crate::state::AppState;
use axum::{extract::State, Json};
use database::ToolFilter;
use serde::Deserialize;
use shared::dto::{Pagination, ToolListResponse, ToolView};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    #[serde(alias = "per_page")]
    pub per_page: Option<i64>,
    pub summary: Option<String>,
}

impl ListQuery {
    fn wants_summary(&self) -> bool {
        self.summary
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("true"))
    }
}

pub async fn list_tools(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> Result<Json<ToolListResponse>, ServiceError> {
    let summary = params.wants_summary();
    let filter = ToolFilter {
        category: params.category,
        search: params.search,
        page: params.page.unwrap_or(1),
        per_page: params.per_page.unwrap_or(state.settings.default_per_page),
    };

    let (tools, total) = state.tools.list(&filter).await?;

    let tools = tools
        .into_iter()
        .map(|tool| {
            if summary {
                ToolView::Summary(tool.into_summary())
            } else {
                ToolView::Full(tool.into_record())
            }
        })
        .collect();

    Ok(Json(ToolListResponse {
        tools,
        pagination: Pagination::new(filter.page(), filter.per_page(), total),
    }))
}
