//! Network-wide efficiency metrics
//!
//! Aggregates the current congestion snapshot into the figures shown to
//! an operator: total cost under each routing policy, Price of Anarchy,
//! throughput and a latency classification. Recomputation is always a
//! full pass; snapshots are replaced wholesale, never patched.

use serde::Serialize;

use crate::model::RoadNetwork;
use crate::routing::RoutingMode;
use crate::routing::cost;
use crate::{Congestion, Cost};

/// Vehicles per hour a fully clear segment can carry
const EDGE_CAPACITY_VPH: f64 = 1800.0;

/// Floor for the optimal-cost denominator
const OPTIMAL_COST_EPSILON: f64 = 1e-9;

const LATENCY_NORMAL_MAX: f64 = 20.0;
const LATENCY_MODERATE_MAX: f64 = 30.0;

/// Latency classification shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LatencyStatus {
    Normal,
    Moderate,
    Critical,
}

impl LatencyStatus {
    /// Bucket a derived latency-minutes value; boundaries are exact:
    /// NORMAL < 20, MODERATE 20-30, CRITICAL > 30
    pub fn classify(latency_minutes: f64) -> Self {
        if latency_minutes < LATENCY_NORMAL_MAX {
            LatencyStatus::Normal
        } else if latency_minutes <= LATENCY_MODERATE_MAX {
            LatencyStatus::Moderate
        } else {
            LatencyStatus::Critical
        }
    }
}

/// Derived efficiency figures for one congestion snapshot
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub nash_cost: Cost,
    pub optimal_cost: Cost,
    pub price_of_anarchy: f64,
    pub total_throughput: f64,
    pub latency_minutes: f64,
    pub latency_status: LatencyStatus,
}

/// The most congested segment (the operator's "worst bottleneck")
#[derive(Debug, Clone, Serialize)]
pub struct Bottleneck {
    pub from: String,
    pub to: String,
    pub congestion: Congestion,
}

/// Full recomputation of all metrics from the network's current state
pub fn compute_metrics(network: &RoadNetwork) -> MetricsSnapshot {
    let mut nash_cost = 0.0;
    let mut optimal_cost = 0.0;
    let mut total_throughput = 0.0;
    let mut current_time_sum = 0.0;

    for (_, _, _, edge) in network.edges() {
        let current = cost::edge_cost(edge, RoutingMode::Current);
        let optimized = cost::edge_cost(edge, RoutingMode::Optimized);
        // flow proxy: the same stored congestion weighs both sums, so the
        // ratio only reflects the cost functions
        nash_cost += edge.congestion * current;
        optimal_cost += edge.congestion * optimized;
        total_throughput += (EDGE_CAPACITY_VPH * (1.0 - edge.congestion / 100.0)).max(0.0);
        current_time_sum += current;
    }

    let price_of_anarchy = if optimal_cost < OPTIMAL_COST_EPSILON {
        // degenerate uncongested case
        1.0
    } else {
        nash_cost / optimal_cost
    };

    let edge_count = network.edge_count();
    let latency_minutes = if edge_count == 0 {
        0.0
    } else {
        current_time_sum / edge_count as f64
    };

    MetricsSnapshot {
        nash_cost,
        optimal_cost,
        price_of_anarchy,
        total_throughput,
        latency_minutes,
        latency_status: LatencyStatus::classify(latency_minutes),
    }
}

/// Highest-congestion segment, or None on an edgeless network
pub fn bottleneck(network: &RoadNetwork) -> Option<Bottleneck> {
    network
        .edges()
        .max_by(|a, b| {
            a.3.congestion
                .partial_cmp(&b.3.congestion)
                .expect("congestion is finite")
        })
        .map(|(_, from, to, edge)| Bottleneck {
            from: from.to_string(),
            to: to.to_string(),
            congestion: edge.congestion,
        })
}
