use anyhow::Result;
use clap::Parser;
use database::Database;
use dotenv::dotenv;
use std::path::PathBuf;
use tools_import::Importer;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tools-import")]
#[command(about = "Load developer tools from a CSV spreadsheet", version)]
struct Args {
    /// CSV file with one tool per row
    csv_path: PathBuf,

    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://tools.db")]
    database_url: String,

    /// Delete every existing tool before importing
    #[arg(long)]
    replace: bool,

    /// JSON object of partial updates keyed by tool name, applied after the import
    #[arg(long, value_name = "JSON")]
    enrich: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let db = Database::connect(&args.database_url, 1).await?;
    db.migrate().await?;

    let importer = Importer::new(db);
    let summary = importer.import_csv(&args.csv_path, args.replace).await?;

    if let Some(path) = &args.enrich {
        let applied = importer.enrich_from_path(path).await?;
        tracing::info!("Applied {} enrichment entries", applied);
    }

    tracing::info!(
        "Import finished: {} imported, {} skipped",
        summary.imported,
        summary.skipped
    );

    Ok(())
}
