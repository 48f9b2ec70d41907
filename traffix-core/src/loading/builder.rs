use log::{info, warn};

use super::EdgeRecord;
use crate::model::network::clamp_congestion;
use crate::model::{RoadEdge, RoadNetwork};
use crate::Error;

/// Builds a road network from a one-shot load of the traffic data source
///
/// A non-empty `nodes` list is authoritative: every edge endpoint must
/// appear in it. An empty list derives the node set from the edges, which
/// is how a bare CSV export is consumed. Initial congestion goes through
/// the same bounds as the simulation mutator.
///
/// # Errors
///
/// Returns an error if both lists are empty or an edge references a node
/// missing from an explicit node list.
pub fn build_road_network(nodes: &[String], edges: &[EdgeRecord]) -> Result<RoadNetwork, Error> {
    if edges.is_empty() && nodes.is_empty() {
        return Err(Error::InvalidData(
            "traffic data source supplied no nodes and no road segments".to_string(),
        ));
    }

    let mut network = RoadNetwork::new();
    for id in nodes {
        network.add_node(id);
    }
    let strict_nodes = !nodes.is_empty();

    let mut skipped = 0usize;
    for record in edges {
        if record.from == record.to {
            warn!("Skipping self-loop segment at '{}'", record.from);
            skipped += 1;
            continue;
        }
        if strict_nodes {
            for endpoint in [&record.from, &record.to] {
                if network.node_index(endpoint).is_err() {
                    return Err(Error::InvalidData(format!(
                        "segment {} -> {} references node '{}' missing from the node list",
                        record.from, record.to, endpoint
                    )));
                }
            }
        }
        let from = network.add_node(&record.from);
        let to = network.add_node(&record.to);
        let edge = RoadEdge::new(
            record.free_flow_time,
            clamp_congestion(record.congestion),
        );
        if network.add_edge(from, to, edge).is_none() {
            warn!(
                "Duplicate segment {} -> {}, keeping the first occurrence",
                record.from, record.to
            );
            skipped += 1;
        }
    }

    info!(
        "Road network loaded: {} nodes, {} segments ({} rows skipped)",
        network.node_count(),
        network.edge_count(),
        skipped
    );
    Ok(network)
}
