//! Server configuration, loaded from a TOML file with CLI overrides

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub addr: SocketAddr,
    /// CSV traffic export loaded into the engine at startup
    pub data: Option<PathBuf>,
    /// Wall-clock cadence of the simulation tick task, in milliseconds
    ///
    /// The speed multiplier scales simulated time per tick, never this
    /// interval.
    pub tick_interval_ms: u64,
    /// Fixed seed for the congestion perturbation; entropy-seeded when unset
    pub rng_seed: Option<u64>,
    /// Simulated hour the clock is seeked to at boot
    pub start_hour: f64,
    /// Maximum number of concurrently processed requests
    pub concurrency_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: "127.0.0.1:8000".parse().expect("valid literal address"),
            data: None,
            tick_interval_ms: 1000,
            rng_seed: None,
            start_hour: 8.0,
            concurrency_limit: 64,
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
