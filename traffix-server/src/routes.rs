//! JSON query surface over the simulation engine

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use traffix_core::routing::{PathResult, RoutingMode};
use traffix_core::{Error, SimHour, TrafficEngine};

use crate::collaborators::{
    CongestionPredictor, Insight, InsightGenerator, InsightRequest, Prediction,
    PredictionRequest,
};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<TrafficEngine>>,
    pub predictor: Arc<dyn CongestionPredictor>,
    pub insights: Arc<dyn InsightGenerator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/traffic-status", get(traffic_status))
        .route("/nodes", get(nodes))
        .route("/display-edges", get(display_edges))
        .route("/route", post(route))
        .route("/simulation/start", post(simulation_start))
        .route("/simulation/pause", post(simulation_pause))
        .route("/simulation/speed", post(simulation_speed))
        .route("/simulation/seek", post(simulation_seek))
        .route("/simulation/mode", post(simulation_mode))
        .route("/simulation/clock", get(simulation_clock))
        .route("/predict-congestion", post(predict_congestion))
        .route("/ai-insight", post(ai_insight))
        .with_state(state)
}

/// Engine errors mapped onto HTTP statuses, always with a JSON body
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidData(_) => StatusCode::BAD_REQUEST,
            Error::InvalidState(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult = Result<Json<serde_json::Value>, ApiError>;

async fn traffic_status(State(state): State<AppState>) -> ApiResult {
    let engine = state.engine.read().await;
    Ok(Json(json!({
        "graph_data": engine.edge_records()?,
        "metrics": engine.get_metrics()?,
        "bottleneck": engine.bottleneck()?,
    })))
}

async fn nodes(State(state): State<AppState>) -> ApiResult {
    let engine = state.engine.read().await;
    Ok(Json(json!({ "nodes": engine.node_ids()? })))
}

async fn display_edges(State(state): State<AppState>) -> ApiResult {
    let engine = state.engine.read().await;
    Ok(Json(json!({ "edges": engine.display_edges()? })))
}

fn default_mode() -> RoutingMode {
    RoutingMode::Current
}

#[derive(Debug, Deserialize)]
struct RouteRequest {
    source: String,
    target: String,
    #[serde(default = "default_mode")]
    mode: RoutingMode,
}

async fn route(
    State(state): State<AppState>,
    Json(body): Json<RouteRequest>,
) -> Result<Json<PathResult>, ApiError> {
    let engine = state.engine.read().await;
    Ok(Json(engine.find_path(&body.source, &body.target, body.mode)?))
}

async fn simulation_start(State(state): State<AppState>) -> ApiResult {
    let mut engine = state.engine.write().await;
    engine.start_simulation()?;
    Ok(Json(json!({ "playing": true })))
}

async fn simulation_pause(State(state): State<AppState>) -> ApiResult {
    let mut engine = state.engine.write().await;
    engine.pause_simulation();
    Ok(Json(json!({ "playing": false })))
}

#[derive(Debug, Deserialize)]
struct SpeedRequest {
    multiplier: u32,
}

async fn simulation_speed(
    State(state): State<AppState>,
    Json(body): Json<SpeedRequest>,
) -> ApiResult {
    let mut engine = state.engine.write().await;
    engine.set_speed(body.multiplier)?;
    Ok(Json(json!({ "speed": engine.speed().factor() })))
}

#[derive(Debug, Deserialize)]
struct SeekRequest {
    hour: SimHour,
}

async fn simulation_seek(
    State(state): State<AppState>,
    Json(body): Json<SeekRequest>,
) -> ApiResult {
    let mut engine = state.engine.write().await;
    engine.seek(body.hour)?;
    Ok(Json(json!({ "hour": engine.simulated_hour() })))
}

#[derive(Debug, Deserialize)]
struct ModeRequest {
    mode: RoutingMode,
}

async fn simulation_mode(
    State(state): State<AppState>,
    Json(body): Json<ModeRequest>,
) -> ApiResult {
    let mut engine = state.engine.write().await;
    engine.set_mode(body.mode);
    Ok(Json(json!({ "mode": engine.mode() })))
}

async fn simulation_clock(State(state): State<AppState>) -> ApiResult {
    let engine = state.engine.read().await;
    Ok(Json(json!({
        "hour": engine.simulated_hour(),
        "playing": engine.is_running(),
        "speed": engine.speed().factor(),
        "mode": engine.mode(),
    })))
}

async fn predict_congestion(
    State(state): State<AppState>,
    Json(body): Json<PredictionRequest>,
) -> Json<Prediction> {
    Json(state.predictor.predict(&body))
}

async fn ai_insight(
    State(state): State<AppState>,
    Json(body): Json<InsightRequest>,
) -> Json<Insight> {
    Json(state.insights.generate(&body))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use traffix_core::loading::EdgeRecord;

    use super::*;
    use crate::collaborators::{HeuristicPredictor, RuleBasedInsights};

    fn record(from: &str, to: &str, congestion: f64) -> EdgeRecord {
        EdgeRecord {
            from: from.to_string(),
            to: to.to_string(),
            congestion,
            free_flow_time: 10.0,
        }
    }

    fn app(loaded: bool) -> Router {
        let mut engine = TrafficEngine::with_seed(7);
        if loaded {
            engine
                .load_graph(&[], &[record("A", "B", 40.0), record("B", "C", 60.0)])
                .unwrap();
        }
        router(AppState {
            engine: Arc::new(RwLock::new(engine)),
            predictor: Arc::new(HeuristicPredictor),
            insights: Arc::new(RuleBasedInsights),
        })
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn loaded_engine_answers_the_read_endpoints() {
        for uri in ["/traffic-status", "/nodes", "/display-edges", "/simulation/clock"] {
            let response = app(true).oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn queries_without_a_graph_are_service_unavailable() {
        for uri in ["/traffic-status", "/nodes", "/display-edges"] {
            let response = app(false).oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        }
    }

    #[tokio::test]
    async fn route_maps_no_route_to_not_found() {
        let body = r#"{"source":"C","target":"A","mode":"current"}"#;
        let response = app(true).oneshot(post_request("/route", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = r#"{"source":"A","target":"C"}"#;
        let response = app(true).oneshot(post_request("/route", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_speed_and_seek_are_bad_requests() {
        let response = app(true)
            .oneshot(post_request("/simulation/speed", r#"{"multiplier":3}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app(true)
            .oneshot(post_request("/simulation/seek", r#"{"hour":24.0}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn collaborator_endpoints_answer_without_a_graph() {
        let body = r#"{"u":"Andheri East","v":"Andheri West","hour":10}"#;
        let response = app(false)
            .oneshot(post_request("/predict-congestion", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = r#"{"poa":1.4,"location":"Andheri East","congestion":88.0,"intent":"cause"}"#;
        let response = app(false)
            .oneshot(post_request("/ai-insight", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
