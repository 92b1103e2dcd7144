//! One-shot CLI for loading the community catalog export into the
//! database. Usage: import_catalog <path/to/catalog.csv>

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use basecoat::{config, db, import};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "basecoat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: import_catalog <path/to/catalog.csv>");
            std::process::exit(2);
        }
    };

    let content = match std::fs::read(&path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!("Failed to read {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let (rows, errors) = match import::parse_catalog_csv(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!("Import aborted: {}", e);
            std::process::exit(1);
        }
    };

    for (line, msg) in &errors {
        tracing::warn!("Skipping line {}: {}", line, msg);
    }

    let config = config::Config::from_env();
    let db = match db::init_db(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    match import::import_catalog(&db, rows).await {
        Ok(summary) => {
            tracing::info!(
                "Import finished: {} imported, {} already present, {} failed, {} rows skipped as malformed",
                summary.imported,
                summary.skipped,
                summary.failed,
                errors.len()
            );
        }
        Err(e) => {
            tracing::error!("Import failed: {}", e);
            std::process::exit(1);
        }
    }
}
