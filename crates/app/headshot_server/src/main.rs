//! Headshot API server binary.
//!
//! Reads configuration from the environment (and `.env`), connects to
//! PostgreSQL unless `--memory-store` is given, and serves the REST API until
//! interrupted.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use headshot_api::config::ApiConfig;
use headshot_api::{AppState, Stores};
use headshot_core::store::memory::MemoryStore;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,headshot_api=debug,headshot_core=debug";

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "headshot_server", about = "Headshot generation API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3100")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/headshot"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Serve from an in-memory store instead of PostgreSQL. Data is lost on
    /// exit.
    #[arg(long, default_value_t = false)]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    config.bind_addr = args.bind_addr;
    config.database_url = args.database_url;

    info!(bind_addr = %config.bind_addr, memory_store = args.memory_store, "starting headshot_server");

    let (stores, pool) = if args.memory_store {
        warn!("using in-memory store; nothing will be persisted");
        (Stores::memory(Arc::new(MemoryStore::new())), None)
    } else {
        info!(max_connections = args.max_connections, "configuring connection pool");
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.database_url)
            .await?;

        info!("running database migrations");
        headshot_api::migrate(&pool).await?;
        (Stores::postgres(pool.clone()), Some(pool))
    };

    let orchestrator = headshot_api::orchestrator_from_config(&config);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    let app = headshot_api::router(AppState::new(config, stores, pool, orchestrator));

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for ctrl-c");
                return;
            }
            info!("interrupt received, shutting down");
            shutdown.cancel();
        }
    });

    info!(addr = %local_addr, "REST API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}
