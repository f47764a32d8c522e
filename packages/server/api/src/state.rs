use crate::config::Settings;
use database::{Database, ToolRepository};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub tools: ToolRepository,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: Arc<Database>, settings: Settings) -> Self {
        Self {
            tools: db.tools(),
            db,
            settings: Arc::new(settings),
        }
    }
}
