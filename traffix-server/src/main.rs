//! HTTP backend for the traffic dashboard
//!
//! Thin presentation layer over `traffix_core`: loads the traffic export,
//! drives the wall-clock tick cadence and exposes the engine's query
//! surface as JSON endpoints.

mod collaborators;
mod config;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::RwLock;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use traffix_core::TrafficEngine;
use traffix_core::loading::read_edge_records;

use crate::collaborators::{HeuristicPredictor, RuleBasedInsights};
use crate::config::ServerConfig;
use crate::routes::AppState;

#[derive(Parser, Debug)]
#[command(name = "traffix-server", about = "Traffic network simulation backend")]
struct Args {
    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Bind address, overrides the config file
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// CSV traffic export, overrides the config file
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(addr) = args.addr {
        config.addr = addr;
    }
    if let Some(data) = args.data {
        config.data = Some(data);
    }

    let mut engine = match config.rng_seed {
        Some(seed) => TrafficEngine::with_seed(seed),
        None => TrafficEngine::new(),
    };
    engine.seek(config.start_hour)?;

    // A failed load leaves the engine without a graph; queries answer 503
    // until a graph arrives, the server itself keeps running.
    match &config.data {
        Some(path) => match read_edge_records(path) {
            Ok(records) => {
                if let Err(e) = engine.load_graph(&[], &records) {
                    warn!("Discarding traffic export {}: {e}", path.display());
                }
            }
            Err(e) => warn!("Could not read traffic export {}: {e}", path.display()),
        },
        None => warn!("No traffic export configured, starting without a graph"),
    }

    let state = AppState {
        engine: Arc::new(RwLock::new(engine)),
        predictor: Arc::new(HeuristicPredictor),
        insights: Arc::new(RuleBasedInsights),
    };

    // Single owner of congestion mutation. The cadence is fixed wall-clock
    // time; the speed multiplier only scales simulated time per tick.
    let tick_engine = Arc::clone(&state.engine);
    let tick_interval = Duration::from_millis(config.tick_interval_ms);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_interval);
        loop {
            interval.tick().await;
            if let Err(e) = tick_engine.write().await.tick() {
                error!("Simulation tick failed: {e}");
            }
        }
    });

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(ConcurrencyLimitLayer::new(config.concurrency_limit));

    info!("Listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install the ctrl-c handler: {e}");
        return;
    }
    info!("Shutting down");
}
