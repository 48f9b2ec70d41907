//! Core engine for city traffic simulation and routing
//!
//! Models a road network as a directed weighted graph, evolves per-edge
//! congestion over simulated time, and answers routing and efficiency
//! queries under two competing policies (selfish and system-optimal).

pub mod engine;
pub mod error;
pub mod loading;
pub mod metrics;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod simulation;
pub mod visual;

pub use engine::TrafficEngine;
pub use error::Error;

/// Percent utilization of an edge's capacity, 0-100 scale
pub type Congestion = f64;

/// Travel cost in minutes
pub type Cost = f64;

/// Simulated hour of day in [0, 24)
pub type SimHour = f64;

/// Minimum ambient load on any edge after a simulation step
pub const CONGESTION_FLOOR: Congestion = 10.0;

/// Practical gridlock ceiling; congestion never saturates to 100
pub const CONGESTION_CEILING: Congestion = 95.0;
