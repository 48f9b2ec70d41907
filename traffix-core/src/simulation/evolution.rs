//! Per-tick growth and decay of edge congestion

use rand::Rng;

use super::clock::{SimulationClock, is_peak_hour};
use crate::model::RoadNetwork;
use crate::routing::cost::OPTIMIZATION_DISCOUNT;
use crate::routing::RoutingMode;
use crate::{Congestion, Error};

// Peak-hour growth band under selfish routing
const PEAK_GROWTH_BASE: f64 = 1.8;
const PEAK_GROWTH_JITTER: f64 = 0.1;

// Narrower band while rerouting absorbs peak load; the shared discount
// from the cost model damps it further
const REROUTED_GROWTH_BASE: f64 = 1.25;
const REROUTED_GROWTH_JITTER: f64 = 0.05;

// Off-peak relaxation toward the floor, strictly below 1
const OFF_PEAK_DECAY_BASE: f64 = 0.9;
const OFF_PEAK_DECAY_JITTER: f64 = 0.05;

/// Congestion growth/decay factor for one edge this tick
fn growth_factor(peak: bool, mode: RoutingMode, rng: &mut impl Rng) -> f64 {
    match (peak, mode) {
        (true, RoutingMode::Current) => {
            PEAK_GROWTH_BASE + rng.gen_range(-PEAK_GROWTH_JITTER..=PEAK_GROWTH_JITTER)
        }
        (true, RoutingMode::Optimized) => {
            (REROUTED_GROWTH_BASE
                + rng.gen_range(-REROUTED_GROWTH_JITTER..=REROUTED_GROWTH_JITTER))
                * OPTIMIZATION_DISCOUNT
        }
        (false, _) => {
            OFF_PEAK_DECAY_BASE + rng.gen_range(-OFF_PEAK_DECAY_JITTER..=OFF_PEAK_DECAY_JITTER)
        }
    }
}

/// Apply one simulation tick to every edge
///
/// All updates are computed up front and applied together through the
/// store's mutator, so a tick lands atomically or not at all. An empty
/// network is a no-op, not an error. The clock advances only after a
/// tick that applied.
pub fn apply_tick(
    network: &mut RoadNetwork,
    clock: &mut SimulationClock,
    mode: RoutingMode,
    rng: &mut impl Rng,
) -> Result<usize, Error> {
    if network.edge_count() == 0 {
        return Ok(0);
    }

    let peak = is_peak_hour(clock.hour());
    let updates: Vec<(petgraph::graph::EdgeIndex, Congestion)> = network
        .graph
        .edge_indices()
        .map(|idx| {
            let factor = growth_factor(peak, mode, rng);
            (idx, network.graph[idx].congestion * factor)
        })
        .collect();

    for &(_, value) in &updates {
        if !value.is_finite() {
            return Err(Error::InvariantViolation(format!(
                "tick produced non-finite congestion {value}"
            )));
        }
    }

    let applied = updates.len();
    for (idx, value) in updates {
        network.apply_congestion_update(idx, value)?;
    }
    clock.advance();
    Ok(applied)
}
