use crate::extract::{ApiJson, ApiPath};
use crate::handlers::ServiceError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use database::models::ToolDraft;
use shared::dto::{ToolPayload, ToolRecord};

pub async fn create_tool(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ToolPayload>,
) -> Result<(StatusCode, Json<ToolRecord>), ServiceError> {
    let draft = ToolDraft::from_payload(&payload)
        .ok()
        .filter(|draft| draft.name.is_some() && draft.category.is_some())
        .ok_or_else(|| ServiceError::BadRequest("Name and category are required".to_string()))?;

    let tool = state.tools.create(&draft).await?;
    tracing::info!("Created tool {} ({})", tool.name, tool.id);

    Ok((StatusCode::CREATED, Json(tool.into_record())))
}

pub async fn update_tool(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ToolPayload>,
) -> Result<Json<ToolRecord>, ServiceError> {
    let draft =
        ToolDraft::from_payload(&payload).map_err(|e| ServiceError::BadRequest(e.to_string()))?;

    let tool = state.tools.update(id, &draft).await?;
    tracing::info!("Updated tool {} ({})", tool.name, tool.id);

    Ok(Json(tool.into_record()))
}

pub async fn delete_tool(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ServiceError> {
    state.tools.delete(id).await?;
    tracing::info!("Deleted tool {}", id);

    Ok(StatusCode::NO_CONTENT)
}
