use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Congestion, Cost};

fn default_free_flow_time() -> Cost {
    10.0
}

/// One directed road segment as supplied by the traffic data source
///
/// Also serves as the wire representation of an edge when the network is
/// reported back out, so `congestion` here is the value at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub congestion: Congestion,
    #[serde(default = "default_free_flow_time")]
    pub free_flow_time: Cost,
}

/// Read edge records from a CSV traffic export
///
/// Rows that fail to deserialize are skipped rather than failing the
/// whole load.
pub fn read_edge_records(path: &Path) -> Result<Vec<EdgeRecord>, std::io::Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    Ok(csv::Reader::from_reader(file)
        .deserialize()
        .filter_map(Result::ok)
        .collect::<Vec<EdgeRecord>>())
}
