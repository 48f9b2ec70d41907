//! Road network components - nodes and directed road segments

use serde::Serialize;

use crate::{Congestion, Cost};

/// Road graph node, identified by a unique location name
#[derive(Debug, Clone, Serialize)]
pub struct RoadNode {
    pub id: String,
}

/// Directed road segment between two nodes
///
/// Two segments with swapped endpoints are distinct entities even where
/// the underlying road is bidirectional; congestion is never symmetrized.
#[derive(Debug, Clone, Serialize)]
pub struct RoadEdge {
    /// Traversal time in minutes at zero load
    pub free_flow_time: Cost,
    /// Current percent utilization, held within the simulation bounds
    pub congestion: Congestion,
}

impl RoadEdge {
    pub fn new(free_flow_time: Cost, congestion: Congestion) -> Self {
        RoadEdge {
            free_flow_time,
            congestion,
        }
    }
}
