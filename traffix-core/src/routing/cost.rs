//! Route cost model
//!
//! Converts an edge's congestion into a traversal cost using the BPR
//! (Bureau of Public Roads) volume-delay curve. The congestion score is
//! treated as a scaled volume/capacity ratio: 20 is free flow, 100 is
//! jammed.

use serde::{Deserialize, Serialize};

use crate::model::RoadEdge;
use crate::{Congestion, Cost};

const BPR_ALPHA: f64 = 0.15;
const BPR_SCALE: f64 = 20.0;
const BPR_POWER: i32 = 4;

/// Congestion level a centrally coordinated assignment is assumed to hold
/// every road at or below
pub const REROUTE_CONGESTION_CAP: Congestion = 70.0;

/// Growth damping applied while rerouting absorbs peak load
///
/// Same reassignment mechanism as [`REROUTE_CONGESTION_CAP`], expressed
/// on the evolution side; the simulator imports it from here so the two
/// layers cannot drift apart.
pub const OPTIMIZATION_DISCOUNT: f64 = 0.85;

/// Routing policy for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Selfish drivers reacting to live congestion (Nash equilibrium)
    Current,
    /// System-optimal assignment with rerouting absorbing excess load
    Optimized,
}

/// BPR travel time in minutes for a given congestion score
pub fn travel_time(free_flow_time: Cost, congestion: Congestion) -> Cost {
    free_flow_time * (1.0 + BPR_ALPHA * (congestion / BPR_SCALE).powi(BPR_POWER))
}

/// Congestion the cost model sees under the given policy
pub fn effective_congestion(congestion: Congestion, mode: RoutingMode) -> Congestion {
    match mode {
        RoutingMode::Current => congestion,
        RoutingMode::Optimized => congestion.min(REROUTE_CONGESTION_CAP),
    }
}

/// Traversal cost of an edge state under the given policy
///
/// Pure: reads the supplied values, mutates nothing.
pub fn cost_for(free_flow_time: Cost, congestion: Congestion, mode: RoutingMode) -> Cost {
    travel_time(free_flow_time, effective_congestion(congestion, mode))
}

/// Traversal cost of an edge under the given policy
pub fn edge_cost(edge: &RoadEdge, mode: RoutingMode) -> Cost {
    cost_for(edge.free_flow_time, edge.congestion, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_bpr_curve() {
        // 20 is treated as free flow: only the alpha term remains
        assert!((travel_time(10.0, 20.0) - 11.5).abs() < 1e-9);
        assert!((travel_time(10.0, 40.0) - 34.0).abs() < 1e-9);
    }

    #[test]
    fn cost_is_monotone_and_convex_in_congestion() {
        let costs: Vec<Cost> = (10..=95)
            .map(|c| travel_time(10.0, f64::from(c)))
            .collect();
        for pair in costs.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        // super-linear growth: the increments themselves grow
        let d1 = costs[1] - costs[0];
        let d2 = costs[costs.len() - 1] - costs[costs.len() - 2];
        assert!(d2 > d1);
    }

    #[test]
    fn optimized_never_costs_more_than_current() {
        for c in [10.0, 40.0, 70.0, 71.0, 95.0] {
            let current = cost_for(10.0, c, RoutingMode::Current);
            let optimized = cost_for(10.0, c, RoutingMode::Optimized);
            assert!(optimized <= current, "congestion {c}");
        }
    }

    #[test]
    fn modes_agree_below_the_reroute_cap() {
        for c in [10.0, 35.0, 70.0] {
            assert_eq!(
                cost_for(10.0, c, RoutingMode::Current),
                cost_for(10.0, c, RoutingMode::Optimized)
            );
        }
    }

    #[test]
    fn cost_is_always_positive() {
        for c in [10.0, 50.0, 95.0] {
            assert!(cost_for(10.0, c, RoutingMode::Current) > 0.0);
            assert!(cost_for(10.0, c, RoutingMode::Optimized) > 0.0);
        }
    }
}
