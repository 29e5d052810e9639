//! Offset API Server
//!
//! Serves soil organic carbon offset reports over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use offset_api::config::ServiceConfig;
use offset_api::state::AppState;

/// Offset API Server
#[derive(Parser, Debug)]
#[command(name = "offset-api")]
#[command(about = "Soil organic carbon offset report server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "OFFSET_API_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "OFFSET_API_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Model file, overrides MODEL_PATH
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Scene catalog, overrides SCENE_CATALOG
    #[arg(long)]
    scene_catalog: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting offset API server");

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let mut config = ServiceConfig::from_env();
    if let Some(path) = args.model_path {
        config.model_path = Some(path);
    }
    if let Some(path) = args.scene_catalog {
        config.scenes.catalog_path = path;
    }

    let state = AppState::from_config(&config)
        .context("Failed to initialize application state")?
        .with_prometheus(prometheus);
    info!(model_loaded = state.model_loaded(), "Pipeline ready");

    let app = offset_api::app(Arc::new(state));

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", args.listen))?;

    info!("Offset API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
