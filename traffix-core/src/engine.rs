//! Standalone simulation engine with an explicit tick/query interface
//!
//! Owns the graph store, the simulation clock and the perturbation
//! source, decoupled from any rendering callback. The presentation
//! layer drives it through this narrow read/command surface.

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::loading::{EdgeRecord, build_road_network};
use crate::metrics::{self, Bottleneck, MetricsSnapshot};
use crate::model::RoadNetwork;
use crate::routing::{self, PathResult, RoutingMode};
use crate::simulation::{self, SimulationClock, SpeedMultiplier};
use crate::visual::{self, DisplayEdge, VisualState};
use crate::{Error, SimHour};

/// Traffic simulation and routing engine
///
/// Single logical timeline: the owner calls [`TrafficEngine::tick`] on a
/// fixed wall-clock cadence; all congestion mutation happens inside it.
/// Queries are synchronous reads against the state between ticks.
pub struct TrafficEngine {
    network: Option<RoadNetwork>,
    clock: SimulationClock,
    mode: RoutingMode,
    rng: ChaCha8Rng,
    metrics: Option<MetricsSnapshot>,
}

impl TrafficEngine {
    /// Engine with an entropy-seeded perturbation source
    pub fn new() -> Self {
        Self::from_rng(ChaCha8Rng::from_entropy())
    }

    /// Engine with a fixed seed, for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        TrafficEngine {
            network: None,
            clock: SimulationClock::default(),
            mode: RoutingMode::Current,
            rng,
            metrics: None,
        }
    }

    /// One-shot load from the traffic data source
    ///
    /// On success the previous network and metrics are replaced wholesale;
    /// on failure the engine keeps whatever it already held.
    pub fn load_graph(&mut self, nodes: &[String], edges: &[EdgeRecord]) -> Result<(), Error> {
        let network = build_road_network(nodes, edges)?;
        self.metrics = Some(metrics::compute_metrics(&network));
        self.network = Some(network);
        info!("Engine loaded a new road network");
        Ok(())
    }

    fn network(&self) -> Result<&RoadNetwork, Error> {
        self.network
            .as_ref()
            .ok_or(Error::InvalidState("no road network loaded"))
    }

    pub fn is_loaded(&self) -> bool {
        self.network.is_some()
    }

    /// Transition the simulation to RUNNING
    pub fn start_simulation(&mut self) -> Result<(), Error> {
        self.network()?;
        self.clock.playing = true;
        Ok(())
    }

    /// Transition the simulation to STOPPED
    ///
    /// Halts further ticks; all derived state stays queryable.
    pub fn pause_simulation(&mut self) {
        self.clock.playing = false;
    }

    pub fn is_running(&self) -> bool {
        self.clock.playing
    }

    pub fn set_speed(&mut self, multiplier: u32) -> Result<(), Error> {
        self.clock.speed = SpeedMultiplier::try_from(multiplier)?;
        Ok(())
    }

    /// Scrub simulated time to an explicit hour
    pub fn seek(&mut self, hour: SimHour) -> Result<(), Error> {
        self.clock.seek(hour)
    }

    pub fn simulated_hour(&self) -> SimHour {
        self.clock.hour()
    }

    pub fn speed(&self) -> SpeedMultiplier {
        self.clock.speed
    }

    pub fn mode(&self) -> RoutingMode {
        self.mode
    }

    /// Switch the active routing policy and refresh the metrics snapshot
    pub fn set_mode(&mut self, mode: RoutingMode) {
        self.mode = mode;
        if let Some(network) = &self.network {
            self.metrics = Some(metrics::compute_metrics(network));
        }
    }

    /// One simulation step
    ///
    /// No-op while STOPPED or with no/empty graph. A tick either applies
    /// to every edge and refreshes the metrics snapshot, or (on failure)
    /// applies to none.
    pub fn tick(&mut self) -> Result<(), Error> {
        if !self.clock.playing {
            return Ok(());
        }
        let Some(network) = self.network.as_mut() else {
            return Ok(());
        };
        let applied = simulation::apply_tick(network, &mut self.clock, self.mode, &mut self.rng)?;
        if applied > 0 {
            self.metrics = Some(metrics::compute_metrics(network));
            debug!(
                "tick applied to {applied} segments, simulated hour {:.2}",
                self.clock.hour()
            );
        }
        Ok(())
    }

    /// Last computed metrics snapshot
    ///
    /// Stable between ticks: two calls with no intervening tick return
    /// identical values.
    pub fn get_metrics(&self) -> Result<MetricsSnapshot, Error> {
        self.network()?;
        self.metrics
            .clone()
            .ok_or(Error::InvalidState("no metrics computed yet"))
    }

    /// Cheapest path under the given policy
    ///
    /// Reads one congestion snapshot for the whole search, so a
    /// concurrent caller interleaving ticks between queries can never
    /// tear a single invocation.
    pub fn find_path(
        &self,
        source: &str,
        target: &str,
        mode: RoutingMode,
    ) -> Result<PathResult, Error> {
        let network = self.network()?;
        let snapshot = network.congestion_snapshot();
        routing::find_path(network, source, target, mode, &snapshot)
    }

    /// Presentation state for one directed segment under the active mode
    pub fn classify_edge(&self, from: &str, to: &str) -> Result<VisualState, Error> {
        let network = self.network()?;
        let edge = network.edge_between(from, to)?;
        let ratio = network.edge(edge).congestion / 100.0;
        Ok(visual::classify(ratio, self.mode))
    }

    /// Collapsed undirected edges for map rendering
    pub fn display_edges(&self) -> Result<Vec<DisplayEdge>, Error> {
        Ok(visual::collapse_for_display(self.network()?))
    }

    /// The currently worst congested segment
    pub fn bottleneck(&self) -> Result<Option<Bottleneck>, Error> {
        Ok(metrics::bottleneck(self.network()?))
    }

    /// All node identifiers
    pub fn node_ids(&self) -> Result<Vec<String>, Error> {
        Ok(self.network()?.node_ids().map(str::to_string).collect())
    }

    /// Wire view of every directed segment with live congestion
    pub fn edge_records(&self) -> Result<Vec<EdgeRecord>, Error> {
        Ok(self
            .network()?
            .edges()
            .map(|(_, from, to, edge)| EdgeRecord {
                from: from.to_string(),
                to: to.to_string(),
                congestion: edge.congestion,
                free_flow_time: edge.free_flow_time,
            })
            .collect())
    }
}

impl Default for TrafficEngine {
    fn default() -> Self {
        Self::new()
    }
}
