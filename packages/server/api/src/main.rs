use anyhow::Context;
use database::Database;
use dotenv::dotenv;
use tools_api::{app, AppState, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load Config
    let settings = Settings::from_env()?;

    // Connect to Database
    let db = Database::connect(&settings.database_url, settings.db_max_connections).await?;
    db.migrate().await?;

    let addr = settings.bind_addr;
    let app = app(AppState::new(db, settings));

    // Start Server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Tools API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
