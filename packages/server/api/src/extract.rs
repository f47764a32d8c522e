//! Extractors whose rejections are reported as `{"error": ...}` bodies.

use crate::handlers::ServiceError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON body. Syntax and type errors are both 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServiceError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServiceError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServiceError))]
pub struct ApiPath<T>(pub T);
