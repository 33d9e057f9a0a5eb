//! Observability infrastructure for the prediction server
//!
//! Prometheus metrics for request-time inference plus a startup gauge for
//! model availability. Logging itself goes through `tracing` at the call
//! sites; this module only owns the metric handles.

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter_vec, GaugeVec, Histogram,
    IntCounterVec,
};
use std::sync::OnceLock;

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServerMetricsInner> = OnceLock::new();

struct ServerMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounterVec,
    prediction_errors_total: IntCounterVec,
    model_loaded: GaugeVec,
}

impl ServerMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "prediction_server_prediction_latency_seconds",
                "Time spent serving a single prediction request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "prediction_server_predictions_total",
                "Predictions served, by model",
                &["model"]
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter_vec!(
                "prediction_server_prediction_errors_total",
                "Failed prediction requests, by model",
                &["model"]
            )
            .expect("Failed to register prediction_errors_total"),

            model_loaded: register_gauge_vec!(
                "prediction_server_model_loaded",
                "Whether a model is loaded and serving (1) or unavailable (0)",
                &["model"]
            )
            .expect("Failed to register model_loaded"),
        }
    }
}

/// Server metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServerMetrics {
    _private: (),
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServerMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a prediction latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner()
            .prediction_latency_seconds
            .observe(duration_secs);
    }

    /// Count a served prediction for a model
    pub fn inc_predictions(&self, model: &str) {
        self.inner()
            .predictions_total
            .with_label_values(&[model])
            .inc();
    }

    /// Count a failed prediction request for a model
    pub fn inc_prediction_errors(&self, model: &str) {
        self.inner()
            .prediction_errors_total
            .with_label_values(&[model])
            .inc();
    }

    /// Record whether a model was loaded at startup
    pub fn set_model_loaded(&self, model: &str, loaded: bool) {
        self.inner()
            .model_loaded
            .with_label_values(&[model])
            .set(if loaded { 1.0 } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_handle_is_shared() {
        let a = ServerMetrics::new();
        let b = ServerMetrics::new();

        a.inc_predictions("diabetes");
        b.inc_predictions("diabetes");
        a.observe_prediction_latency(0.002);
        a.set_model_loaded("autism", true);
        a.inc_prediction_errors("heart");

        let families = prometheus::gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "prediction_server_predictions_total"));
    }
}
