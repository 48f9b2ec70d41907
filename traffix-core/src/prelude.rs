// Re-export of key components
pub use crate::engine::TrafficEngine;
pub use crate::error::Error;
pub use crate::loading::{EdgeRecord, build_road_network, read_edge_records};
pub use crate::metrics::{Bottleneck, LatencyStatus, MetricsSnapshot};
pub use crate::model::{RoadEdge, RoadNetwork, RoadNode};
pub use crate::routing::{PathEdge, PathResult, RoutingMode, find_path};
pub use crate::simulation::{SimulationClock, SpeedMultiplier};
pub use crate::visual::{DisplayEdge, FlowCategory, VisualState, classify, collapse_for_display};

// Core scalar types
pub use crate::Congestion;
pub use crate::Cost; // minutes
pub use crate::SimHour;
pub use crate::{CONGESTION_CEILING, CONGESTION_FLOOR};
