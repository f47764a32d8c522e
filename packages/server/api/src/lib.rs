pub mod config;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::Settings;
pub use router::app;
pub use state::AppState;
