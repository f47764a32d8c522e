use database::Database;
use std::sync::Arc;

pub mod columns;
pub mod enrich;
pub mod import;

pub use import::ImportSummary;

/// Loads catalog data into the shared database.
pub struct Importer {
    db: Arc<Database>,
}

impl Importer {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}
