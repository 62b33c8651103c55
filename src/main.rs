use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jobsy_api::app::{router, AppState};
use jobsy_api::config::AppConfig;
use jobsy_api::database::{DatabaseManager, DocumentStore, MemoryDocumentStore, PgDocumentStore};

/// Jobsy API server
#[derive(Debug, Parser)]
#[command(name = "jobsy-api", version, about)]
struct Cli {
    /// Bind address (overrides JOBSY_API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides JOBSY_API_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Keep all data in process memory even when DATABASE_URL is set
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobsy_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate().map_err(anyhow::Error::msg)?;
    tracing::info!("Starting Jobsy API in {:?} mode", config.environment);

    let store: Arc<dyn DocumentStore> = match (&config.database.url, cli.in_memory) {
        (Some(_), false) => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            let store = PgDocumentStore::new(pool);
            store.ensure_schema().await.context("failed to prepare document schema")?;
            Arc::new(store)
        }
        _ => {
            tracing::warn!("No database configured; data is kept in memory and lost on exit");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, store).context("invalid password hashing parameters")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Jobsy API listening on http://{}", bind_addr);

    axum::serve(listener, router(state)).await.context("server error")?;
    Ok(())
}
