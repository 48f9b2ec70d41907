//! Graph store: immutable topology with mutable per-edge congestion

use hashbrown::HashMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

use super::{RoadEdge, RoadNode};
use crate::{CONGESTION_CEILING, CONGESTION_FLOOR, Congestion, Error};

/// Clamp a congestion value into the simulation bounds
pub(crate) fn clamp_congestion(value: Congestion) -> Congestion {
    value.clamp(CONGESTION_FLOOR, CONGESTION_CEILING)
}

/// City road network
///
/// Topology is fixed after construction; the only mutable state is each
/// edge's congestion, and [`RoadNetwork::apply_congestion_update`] is the
/// sole path that writes it.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    pub(crate) graph: DiGraph<RoadNode, RoadEdge>,
    node_index: HashMap<String, NodeIndex>,
    pair_index: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
}

impl RoadNetwork {
    pub(crate) fn new() -> Self {
        RoadNetwork {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            pair_index: HashMap::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All node identifiers, in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|node| node.id.as_str())
    }

    /// Resolve a node identifier to its graph index
    pub fn node_index(&self, id: &str) -> Result<NodeIndex, Error> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| Error::NotFound(format!("unknown node '{id}'")))
    }

    /// Resolve a directed (from, to) pair to its edge index
    pub fn edge_between(&self, from: &str, to: &str) -> Result<EdgeIndex, Error> {
        let pair = (self.node_index(from)?, self.node_index(to)?);
        self.pair_index
            .get(&pair)
            .copied()
            .ok_or_else(|| Error::NotFound(format!("no road segment {from} -> {to}")))
    }

    pub fn node(&self, index: NodeIndex) -> &RoadNode {
        &self.graph[index]
    }

    pub fn edge(&self, index: EdgeIndex) -> &RoadEdge {
        &self.graph[index]
    }

    /// Endpoint identifiers of an edge
    pub(crate) fn edge_endpoints(&self, index: EdgeIndex) -> (&str, &str) {
        let (a, b) = self
            .graph
            .edge_endpoints(index)
            .expect("edge index from this graph");
        (self.graph[a].id.as_str(), self.graph[b].id.as_str())
    }

    /// Iterate all edges as (index, from id, to id, edge)
    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, &str, &str, &RoadEdge)> {
        self.graph.edge_indices().map(|idx| {
            let (from, to) = self.edge_endpoints(idx);
            (idx, from, to, &self.graph[idx])
        })
    }

    /// Dense copy of every edge's congestion, indexed by `EdgeIndex::index`
    ///
    /// Gives callers a consistent snapshot to read against while ticks
    /// keep mutating the live values.
    pub fn congestion_snapshot(&self) -> Vec<Congestion> {
        self.graph
            .edge_indices()
            .map(|idx| self.graph[idx].congestion)
            .collect()
    }

    /// The sole congestion mutator
    ///
    /// Clamps the new value into the simulation bounds before storing, so
    /// no caller can push an edge outside them. A non-finite value is a
    /// logic defect upstream and fails loudly instead of being clamped.
    pub fn apply_congestion_update(
        &mut self,
        edge: EdgeIndex,
        new_value: Congestion,
    ) -> Result<Congestion, Error> {
        if !new_value.is_finite() {
            return Err(Error::InvariantViolation(format!(
                "non-finite congestion update {new_value} on edge {}",
                edge.index()
            )));
        }
        let clamped = clamp_congestion(new_value);
        let weight = self
            .graph
            .edge_weight_mut(edge)
            .ok_or_else(|| Error::NotFound(format!("unknown edge index {}", edge.index())))?;
        weight.congestion = clamped;
        Ok(clamped)
    }

    pub(crate) fn edge_between_indices(
        &self,
        from: NodeIndex,
        to: NodeIndex,
    ) -> Option<EdgeIndex> {
        self.pair_index.get(&(from, to)).copied()
    }

    pub(crate) fn add_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(RoadNode { id: id.to_string() });
        self.node_index.insert(id.to_string(), idx);
        idx
    }

    /// Insert a directed edge; returns None when the pair already exists
    pub(crate) fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        edge: RoadEdge,
    ) -> Option<EdgeIndex> {
        if self.pair_index.contains_key(&(from, to)) {
            return None;
        }
        let idx = self.graph.add_edge(from, to, edge);
        self.pair_index.insert((from, to), idx);
        Some(idx)
    }
}
