use axum::{routing::get, Router};

pub mod list;
pub mod read;
pub mod search;
pub mod write;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tools", get(list::list_tools).post(write::create_tool))
        .route("/tools/categories", get(read::list_categories))
        .route("/tools/search", get(search::search_tools))
        .route("/tools/stats", get(read::stats))
        .route(
            "/tools/:id",
            get(read::get_tool)
                .put(write::update_tool)
                .delete(write::delete_tool),
        )
}
