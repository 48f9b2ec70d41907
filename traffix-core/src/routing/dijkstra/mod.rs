//! Single-source shortest path search over the road network
//!
//! Costs come entirely from the route cost model under the caller's
//! policy, evaluated against a congestion snapshot taken at call entry,
//! so one invocation never observes a torn mix of pre- and post-tick
//! values. Ties on total cost prefer fewer hops, then the
//! lexicographically smallest node-id sequence.

mod state;

use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::Serialize;

use self::state::{MilliCost, State, to_milli};
use super::cost::{self, RoutingMode};
use crate::model::RoadNetwork;
use crate::{Congestion, Cost, Error};

/// One traversed segment with its congestion at query time
#[derive(Debug, Clone, Serialize)]
pub struct PathEdge {
    pub from: String,
    pub to: String,
    pub congestion: Congestion,
    pub cost: Cost,
}

/// A computed route
///
/// Immutable once returned; later simulation ticks do not invalidate it.
#[derive(Debug, Clone, Serialize)]
pub struct PathResult {
    pub nodes: Vec<String>,
    pub edges: Vec<PathEdge>,
    pub total_cost: Cost,
}

/// Dijkstra's algorithm from `source` to `target` under the given policy
///
/// `snapshot` is the dense congestion copy the whole search reads from.
/// Never mutates the network.
///
/// # Errors
///
/// `NotFound` for an unknown endpoint or an unreachable target; the
/// latter is an expected outcome the caller branches on.
pub fn find_path(
    network: &RoadNetwork,
    source: &str,
    target: &str,
    mode: RoutingMode,
    snapshot: &[Congestion],
) -> Result<PathResult, Error> {
    let start = network.node_index(source)?;
    let goal = network.node_index(target)?;

    // A route to itself is a valid zero-cost, zero-edge path
    if start == goal {
        return Ok(PathResult {
            nodes: vec![source.to_string()],
            edges: Vec::new(),
            total_cost: 0.0,
        });
    }

    let estimated_nodes = network.node_count();
    let mut distances: HashMap<NodeIndex, (MilliCost, u32)> =
        HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut settled = FixedBitSet::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4 + 1);

    heap.push(State {
        cost: 0,
        hops: 0,
        node: start,
    });
    distances.insert(start, (0, 0));

    while let Some(State { cost, hops, node }) = heap.pop() {
        if settled.contains(node.index()) {
            continue;
        }
        // Skip if we've found a better entry since this one was pushed
        if let Some(&best) = distances.get(&node) {
            if (cost, hops) > best {
                continue;
            }
        }
        settled.insert(node.index());

        if node == goal {
            break;
        }

        for edge in network.graph.edges(node) {
            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }
            let congestion = snapshot[edge.id().index()];
            let edge_cost = cost::cost_for(edge.weight().free_flow_time, congestion, mode);
            let next_key = (cost + to_milli(edge_cost), hops + 1);

            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_key);
                    predecessors.insert(next, node);
                    heap.push(State {
                        cost: next_key.0,
                        hops: next_key.1,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_key < *entry.get() {
                        *entry.get_mut() = next_key;
                        predecessors.insert(next, node);
                        heap.push(State {
                            cost: next_key.0,
                            hops: next_key.1,
                            node: next,
                        });
                    } else if next_key == *entry.get()
                        && prefers_sequence(network, &predecessors, start, node, next)
                    {
                        // Equal cost and hops: keep the lexicographically
                        // smallest node-id sequence for determinism
                        predecessors.insert(next, node);
                    }
                }
            }
        }
    }

    if !distances.contains_key(&goal) || !settled.contains(goal.index()) {
        return Err(Error::NotFound(format!(
            "no route from '{source}' to '{target}'"
        )));
    }

    Ok(reconstruct(network, &predecessors, start, goal, mode, snapshot))
}

/// True when routing `next` through `candidate` yields a lexicographically
/// smaller node-id sequence than its current predecessor chain
fn prefers_sequence(
    network: &RoadNetwork,
    predecessors: &HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
    candidate: NodeIndex,
    next: NodeIndex,
) -> bool {
    let current = chain_ids(network, predecessors, start, next);
    let mut via = chain_ids(network, predecessors, start, candidate);
    via.push(network.node(next).id.as_str());
    via < current
}

/// Node-id sequence from `start` to `end` following the predecessor map
fn chain_ids<'a>(
    network: &'a RoadNetwork,
    predecessors: &HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
    end: NodeIndex,
) -> Vec<&'a str> {
    let mut ids = Vec::new();
    let mut current = end;
    ids.push(network.node(current).id.as_str());
    while current != start {
        match predecessors.get(&current) {
            Some(&prev) => current = prev,
            None => break,
        }
        ids.push(network.node(current).id.as_str());
    }
    ids.reverse();
    ids
}

fn reconstruct(
    network: &RoadNetwork,
    predecessors: &HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
    goal: NodeIndex,
    mode: RoutingMode,
    snapshot: &[Congestion],
) -> PathResult {
    let mut indices = Vec::new();
    let mut current = goal;
    indices.push(current);
    while current != start {
        let &prev = predecessors
            .get(&current)
            .expect("predecessor chain reaches the start");
        indices.push(prev);
        current = prev;
    }
    indices.reverse();

    let nodes: Vec<String> = indices
        .iter()
        .map(|&idx| network.node(idx).id.clone())
        .collect();

    let mut edges = Vec::with_capacity(indices.len() - 1);
    let mut total_cost = 0.0;
    for pair in indices.windows(2) {
        let edge_idx = network
            .edge_between_indices(pair[0], pair[1])
            .expect("path follows existing segments");
        let congestion = snapshot[edge_idx.index()];
        let edge_cost =
            cost::cost_for(network.edge(edge_idx).free_flow_time, congestion, mode);
        total_cost += edge_cost;
        edges.push(PathEdge {
            from: network.node(pair[0]).id.clone(),
            to: network.node(pair[1]).id.clone(),
            congestion,
            cost: edge_cost,
        });
    }

    PathResult {
        nodes,
        edges,
        total_cost,
    }
}
