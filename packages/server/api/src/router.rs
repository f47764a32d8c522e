use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Catalog routes, served both at the root and under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(handlers::tools::router())
        .nest("/api", handlers::tools::router())
}

/// Fully layered application.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    match &state.settings.cors_origin {
        Some(origin) => cors.allow_origin(origin.clone()).allow_credentials(true),
        None => cors.allow_origin(Any),
    }
}
