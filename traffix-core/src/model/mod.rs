//! Data model for the road network
//!
//! Contains types and structures for representing the city road graph
//! and its mutable congestion state.

pub mod components;
pub mod network;

pub use components::{RoadEdge, RoadNode};
pub use network::RoadNetwork;
