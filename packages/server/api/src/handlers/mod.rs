use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::RepoError;
use serde_json::json;

pub mod health;
pub mod tools;

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    Conflict(String),
    BadRequest(String),
    DatabaseError(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ServiceError::NotFound(e) => (StatusCode::NOT_FOUND, e),
            ServiceError::Conflict(e) => (StatusCode::CONFLICT, e),
            ServiceError::BadRequest(e) => (StatusCode::BAD_REQUEST, e),
            ServiceError::DatabaseError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(_) => ServiceError::NotFound("Tool not found".to_string()),
            RepoError::Conflict(_) => {
                ServiceError::Conflict("Tool with this name already exists".to_string())
            }
            RepoError::Validation(msg) => ServiceError::BadRequest(msg),
            RepoError::Database(e) => {
                tracing::error!("Database operation failed: {}", e);
                ServiceError::DatabaseError("Database operation failed".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::BadRequest(rejection.body_text())
    }
}
