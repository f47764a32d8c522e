use crate::extract::ApiPath;
use crate::handlers::ServiceError;
use crate::state::AppState;
use axum::{extract::State, Json};
use shared::dto::{CategoriesResponse, StatsResponse, ToolRecord};

pub async fn get_tool(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ToolRecord>, ServiceError> {
    let tool = state.tools.get_by_id(id).await?;
    Ok(Json(tool.into_record()))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ServiceError> {
    let categories = state.tools.distinct_categories().await?;
    Ok(Json(CategoriesResponse { categories }))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ServiceError> {
    let stats = state.tools.stats().await?;

    Ok(Json(StatsResponse {
        total_tools: stats.total_tools,
        total_categories: stats.total_categories,
        category_breakdown: stats.category_breakdown,
    }))
}
