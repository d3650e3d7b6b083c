//! Prometheus metrics and the health/metrics HTTP endpoint.

use crate::error::ControllerError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};

/// Controller metrics.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    reconciliations: IntCounterVec,
    power_actions: IntCounterVec,
    ready: Arc<AtomicBool>,
}

impl Metrics {
    /// Create and register all metrics.
    pub fn new() -> Result<Self, ControllerError> {
        let registry = Registry::new();

        let reconciliations = IntCounterVec::new(
            Opts::new("server_power_reconciliations_total", "Server reconciliations by result"),
            &["result"],
        )?;
        registry.register(Box::new(reconciliations.clone()))?;

        let power_actions = IntCounterVec::new(
            Opts::new("server_power_actions_total", "Power actions issued by kind and result"),
            &["kind", "result"],
        )?;
        registry.register(Box::new(power_actions.clone()))?;

        Ok(Self {
            registry,
            reconciliations,
            power_actions,
            ready: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn record_reconciliation(&self, result: &str) {
        self.reconciliations.with_label_values(&[result]).inc();
    }

    pub fn record_power_action(&self, kind: &str, success: bool) {
        let result = if success { "success" } else { "error" };
        self.power_actions.with_label_values(&[kind, result]).inc();
    }

    #[cfg(test)]
    pub fn reconciliation_count(&self, result: &str) -> u64 {
        self.reconciliations.with_label_values(&[result]).get()
    }

    #[cfg(test)]
    pub fn power_action_count(&self, kind: &str, success: bool) -> u64 {
        let result = if success { "success" } else { "error" };
        self.power_actions.with_label_values(&[kind, result]).get()
    }

    /// Mark the controller as ready to serve.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }

    /// Metrics in Prometheus text format.
    pub fn export(&self) -> Result<String, ControllerError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn readyz(State(metrics): State<Metrics>) -> Response {
    if metrics.ready.load(Ordering::Relaxed) {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
    }
}

async fn metrics_handler(State(metrics): State<Metrics>) -> Response {
    match metrics.export() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to export metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Router serving `/healthz`, `/readyz` and `/metrics`.
pub fn router(metrics: Metrics) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

/// Serve the health/metrics endpoint until `shutdown` resolves.
pub async fn serve<F>(address: SocketAddr, metrics: Metrics, shutdown: F) -> Result<(), ControllerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("Health and metrics endpoint listening on {}", address);
    axum::serve(listener, router(metrics))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_exported() {
        let metrics = Metrics::new().unwrap();
        metrics.record_reconciliation("done");
        metrics.record_power_action("wake", true);

        let output = metrics.export().unwrap();
        assert!(output.contains("server_power_reconciliations_total{result=\"done\"} 1"));
        assert!(output.contains("server_power_actions_total{kind=\"wake\",result=\"success\"} 1"));
    }

    #[tokio::test]
    async fn test_readyz_follows_flag() {
        let metrics = Metrics::new().unwrap();
        let response = readyz(State(metrics.clone())).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        metrics.set_ready(true);
        let response = readyz(State(metrics)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_serves_text() {
        let metrics = Metrics::new().unwrap();
        metrics.record_power_action("bmc_off", false);

        let response = metrics_handler(State(metrics)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; version=0.0.4; charset=utf-8"
        );
    }
}
