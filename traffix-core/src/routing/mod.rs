//! Path search over the road network under a routing policy

pub mod cost;
pub mod dijkstra;

pub use cost::{RoutingMode, edge_cost, travel_time};
pub use dijkstra::{PathEdge, PathResult, find_path};
