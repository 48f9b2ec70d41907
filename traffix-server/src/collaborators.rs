//! External collaborator seams
//!
//! The congestion predictor and the insight generator are remote services
//! in a full deployment. The local fallbacks here keep the dashboard
//! functional when those services are absent; neither path ever touches
//! simulation state.

use std::hash::{DefaultHasher, Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::json;

fn default_visibility() -> f64 {
    1.0
}

fn default_temperature() -> f64 {
    30.0
}

fn default_event_type() -> String {
    "None".to_string()
}

/// Conditions a congestion forecast is requested for
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    pub u: String,
    pub v: String,
    pub hour: u32,
    #[serde(default)]
    pub rain_intensity: f64,
    #[serde(default = "default_visibility")]
    pub visibility: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_event_type")]
    pub event_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Forecast percent utilization, 0-100
    pub congestion: f64,
    /// Forecast speed in km/h
    pub speed: f64,
    pub confidence: String,
}

pub trait CongestionPredictor: Send + Sync {
    fn predict(&self, request: &PredictionRequest) -> Prediction;
}

/// Fallback forecaster used when the remote model is unreachable
///
/// Deterministic per (u, v, hour): the same edge and hour always forecast
/// the same values, so repeated queries from the dashboard agree.
pub struct HeuristicPredictor;

impl CongestionPredictor for HeuristicPredictor {
    fn predict(&self, request: &PredictionRequest) -> Prediction {
        let mut hasher = DefaultHasher::new();
        request.u.hash(&mut hasher);
        request.v.hash(&mut hasher);
        request.hour.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(hasher.finish());

        let congestion: f64 = rng.gen_range(20.0..=90.0);
        let speed = (60.0 * (1.0 - congestion / 100.0)).max(10.0);
        Prediction {
            congestion: round1(congestion),
            speed: round1(speed),
            confidence: "Low (Heuristic)".to_string(),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Situation the operator asked about
#[derive(Debug, Clone, Deserialize)]
pub struct InsightRequest {
    pub poa: f64,
    pub location: String,
    pub congestion: f64,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

/// Free text or a JSON-encoded `{cause, impact, action, cooldown}` object,
/// matching what the remote language-model service returns
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub insight: String,
    pub format: &'static str,
}

pub trait InsightGenerator: Send + Sync {
    fn generate(&self, request: &InsightRequest) -> Insight;
}

/// Rule-based stand-in for the remote language-model service
///
/// Covers the same intent taxonomy the dashboard sends: cause, routes,
/// cooldown, strategy, and free-form questions.
pub struct RuleBasedInsights;

impl RuleBasedInsights {
    fn cause(request: &InsightRequest) -> String {
        format!(
            "Drivers keep picking the individually fastest road through {} even at {:.0}% load, \
             the Nash Equilibrium of selfish routing, so the bottleneck feeds itself.",
            request.location, request.congestion
        )
    }

    fn impact(request: &InsightRequest) -> String {
        format!(
            "Network travel cost is {:.0}% above the coordinated optimum (PoA {:.2}).",
            (request.poa - 1.0).max(0.0) * 100.0,
            request.poa
        )
    }

    fn action(request: &InsightRequest) -> String {
        format!(
            "Divert a share of inbound traffic away from {} onto parallel arterials with a \
             temporary congestion charge on the bottleneck link.",
            request.location
        )
    }

    fn cooldown(request: &InsightRequest) -> String {
        // Rough relaxation estimate: each 10 points over half load costs
        // about 15 minutes of decay
        let steps = ((request.congestion - 50.0) / 10.0).max(1.0).ceil();
        format!(
            "Roughly {:.0} minutes for {} to relax to ambient levels once inflow drops.",
            steps * 15.0,
            request.location
        )
    }
}

impl InsightGenerator for RuleBasedInsights {
    fn generate(&self, request: &InsightRequest) -> Insight {
        if request.query.is_some() {
            return Insight {
                insight: json!({
                    "cause": Self::cause(request),
                    "impact": Self::impact(request),
                    "action": Self::action(request),
                    "cooldown": Self::cooldown(request),
                })
                .to_string(),
                format: "json",
            };
        }

        if let Some(intent) = request.intent.as_deref() {
            let body = match intent {
                "cause" => json!({ "cause": Self::cause(request) }),
                "routes" => json!({ "action": Self::action(request) }),
                "cooldown" => json!({ "cooldown": Self::cooldown(request) }),
                "strategy" => json!({
                    "action": Self::action(request),
                    "impact": Self::impact(request),
                }),
                _ => json!({
                    "cause": Self::cause(request),
                    "impact": Self::impact(request),
                    "action": Self::action(request),
                }),
            };
            return Insight {
                insight: body.to_string(),
                format: "json",
            };
        }

        Insight {
            insight: format!("{} {}", Self::impact(request), Self::action(request)),
            format: "text",
        }
    }
}
