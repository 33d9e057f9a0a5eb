//! HTTP API for predictions, service status and Prometheus metrics

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{Category, DispatchError, ModelRegistry, PredictRequest, ServerMetrics};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state
pub struct AppState {
    pub registry: ModelRegistry,
    pub metrics: ServerMetrics,
}

impl AppState {
    pub fn new(registry: ModelRegistry, metrics: ServerMetrics) -> Self {
        Self { registry, metrics }
    }
}

/// Wire shape of every error response
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Service status: always 200 with per-model availability
async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.registry.status())
}

/// Run one prediction against a named model
///
/// A missing or malformed body counts as the empty request; the autism
/// fallback chain still produces a usable feature vector for it.
async fn predict(
    State(state): State<Arc<AppState>>,
    Path(model_name): Path<String>,
    body: Option<Json<PredictRequest>>,
) -> impl IntoResponse {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let category = Category::from_route(&model_name);
    let label = category.map_or("unknown", |c| c.route_name());

    let started = Instant::now();
    let result = match category {
        Some(category) => state.registry.predict(category, &request),
        // Unknown names surface exactly like known-but-unloaded models
        None => Err(DispatchError::ModelUnavailable),
    };
    state
        .metrics
        .observe_prediction_latency(started.elapsed().as_secs_f64());

    match result {
        Ok(prediction) => {
            state.metrics.inc_predictions(label);
            (StatusCode::OK, Json(prediction)).into_response()
        }
        Err(err) => {
            state.metrics.inc_prediction_errors(label);
            let status = match &err {
                DispatchError::MissingFeatures => StatusCode::BAD_REQUEST,
                DispatchError::ModelUnavailable | DispatchError::Prediction(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let body = ErrorBody {
                error: err.to_string(),
            };
            (status, Json(body)).into_response()
        }
    }
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Web clients (the assessment UI) call from other origins
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/predict/:model", post(predict))
        .route("/metrics", get(metrics))
        .layer(cors_layer())
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
