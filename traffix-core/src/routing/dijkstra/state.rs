use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

/// Search cost quantized to thousandths of a minute so heap ordering is
/// total and deterministic
pub(super) type MilliCost = u64;

pub(super) fn to_milli(cost: f64) -> MilliCost {
    (cost * 1000.0).round() as MilliCost
}

#[derive(Copy, Clone, Eq, PartialEq)]
pub(super) struct State {
    pub(super) cost: MilliCost,
    pub(super) hops: u32,
    pub(super) node: NodeIndex,
}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost, then hop count (reversed from standard Rust BinaryHeap)
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.hops.cmp(&self.hops))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
