//! Server Power Controller
//!
//! Drives bare-metal machines described by `Server` resources to their desired
//! power state (Wake-on-LAN + SSH or IPMI) and exposes the fleet to the cluster
//! autoscaler through the externalgrpc CloudProvider API.

mod backoff;
mod config;
mod controller;
mod error;
mod metrics;
mod phase;
mod reconciler;
mod watcher;

#[cfg(test)]
mod test_utils;

use crate::config::Config;
use crate::error::ControllerError;
use controller::Controller;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // kube and tonic both pull in rustls; pick the provider explicitly
    let _ = rustls::crypto::ring::default_provider().install_default();

    info!("Starting Server Power Controller");

    let config = Config::from_env()?;
    info!("Configuration:");
    info!("  gRPC address: {}", config.grpc.address);
    info!("  gRPC TLS: {}", if config.grpc.is_tls_enabled() { "enabled" } else { "disabled" });
    info!("  Requeue interval: {:?}", config.requeue_interval);
    info!("  Resync interval: {:?}", config.resync_interval);
    info!("  Failure threshold: {}", config.failure_threshold);
    info!("  Metrics address: {}", config.metrics_address);

    let controller = Controller::new(config).await?;
    controller.run(shutdown_signal()).await
}
