//! Visual classification of congestion for the rendering layer
//!
//! Pure, derived presentation state; nothing here feeds back into the
//! graph store.

use hashbrown::HashMap;
use itertools::Itertools;
use serde::Serialize;

use crate::model::RoadNetwork;
use crate::routing::RoutingMode;
use crate::Congestion;

const CONGESTION_THRESHOLD: f64 = 0.5;
const MODERATE_THRESHOLD: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowCategory {
    FreeFlow,
    Moderate,
    Congestion,
}

/// Presentation state for one rendered edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualState {
    pub category: FlowCategory,
    pub animation_rate: f64,
    pub opacity: f64,
}

const FREE_FLOW_STATE: VisualState = VisualState {
    category: FlowCategory::FreeFlow,
    animation_rate: 1.0,
    opacity: 0.55,
};

const MODERATE_STATE: VisualState = VisualState {
    category: FlowCategory::Moderate,
    animation_rate: 1.6,
    opacity: 0.75,
};

const CONGESTION_STATE: VisualState = VisualState {
    category: FlowCategory::Congestion,
    animation_rate: 2.4,
    opacity: 0.95,
};

/// Map a congestion ratio (0-1 scale) and policy to presentation state
///
/// Optimized mode always renders FREE_FLOW regardless of the underlying
/// value: the system presents optimized routing as uniformly smooth.
/// Callers that need the true load must read the store, not this.
pub fn classify(congestion_ratio: f64, mode: RoutingMode) -> VisualState {
    if mode == RoutingMode::Optimized {
        return FREE_FLOW_STATE;
    }
    if congestion_ratio > CONGESTION_THRESHOLD {
        CONGESTION_STATE
    } else if congestion_ratio > MODERATE_THRESHOLD {
        MODERATE_STATE
    } else {
        FREE_FLOW_STATE
    }
}

/// One undirected edge as drawn on the map
#[derive(Debug, Clone, Serialize)]
pub struct DisplayEdge {
    pub a: String,
    pub b: String,
    /// Average of the directional congestion values
    pub congestion: Congestion,
    pub bidirectional: bool,
}

/// Collapse directional twins into single display edges
///
/// Two directed segments with swapped endpoints average into one visual
/// value. Display-only: the authoritative per-direction state in the
/// store is untouched, and routing keeps reading it.
pub fn collapse_for_display(network: &RoadNetwork) -> Vec<DisplayEdge> {
    let mut grouped: HashMap<(String, String), (f64, usize)> = HashMap::new();
    for (_, from, to, edge) in network.edges() {
        let key = if from <= to {
            (from.to_string(), to.to_string())
        } else {
            (to.to_string(), from.to_string())
        };
        let entry = grouped.entry(key).or_insert((0.0, 0));
        entry.0 += edge.congestion;
        entry.1 += 1;
    }

    grouped
        .into_iter()
        .map(|((a, b), (sum, count))| DisplayEdge {
            a,
            b,
            congestion: sum / count as f64,
            bidirectional: count > 1,
        })
        .sorted_by(|x, y| (&x.a, &x.b).cmp(&(&y.a, &y.b)))
        .collect()
}
