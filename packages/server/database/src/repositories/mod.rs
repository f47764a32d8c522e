pub mod tool_repo;

pub use tool_repo::{CatalogStats, SearchCriteria, ToolFilter, ToolRepository};
