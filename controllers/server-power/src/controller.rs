//! Main controller implementation.
//!
//! Wires the Kubernetes client, power backends and reconciler together, then runs
//! three tasks side by side until shutdown:
//! - the `Server` watcher driving reconciliation
//! - the cluster-autoscaler CloudProvider gRPC endpoint
//! - the health and metrics HTTP endpoint

use crate::config::Config;
use crate::error::ControllerError;
use crate::metrics::Metrics;
use crate::reconciler::{PowerBackends, Reconciler};
use crate::watcher::Watcher;
use kube::Client;
use power_client::{IpmitoolClient, PingProbe, SshShutdownExecutor, UdpWakeSender};
use server_store::{KubeServerStore, ServerStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

/// How long running tasks get to wind down after shutdown is signalled.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Resolves once `true` is sent on the shutdown channel (or the sender is gone).
fn shutdown_requested(mut rx: watch::Receiver<bool>) -> impl Future<Output = ()> + Send + Sync + 'static {
    async move {
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}

fn task_result(
    task: &str,
    result: Result<Result<(), ControllerError>, JoinError>,
) -> Result<(), ControllerError> {
    result
        .map_err(|e| ControllerError::Watch(format!("{} panicked: {}", task, e)))?
        .map_err(|e| ControllerError::Watch(format!("{} error: {}", task, e)))?;
    Err(ControllerError::Watch(format!("{} exited unexpectedly", task)))
}

/// Main controller for server power management.
pub struct Controller {
    metrics: Metrics,
    shutdown_tx: watch::Sender<bool>,
    server_watcher: JoinHandle<Result<(), ControllerError>>,
    grpc_server: JoinHandle<Result<(), ControllerError>>,
    metrics_server: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance and starts its tasks.
    pub async fn new(config: Config) -> Result<Self, ControllerError> {
        info!("Initializing Server Power Controller");

        let kube_client = Client::try_default().await?;
        let kube_store = KubeServerStore::new(kube_client);
        let server_api = kube_store.api();
        let store: Arc<dyn ServerStore> = Arc::new(kube_store);

        // Fails fast when the CRD is missing or RBAC forbids listing servers
        match store.list().await {
            Ok(servers) => info!("Found {} Server resources", servers.len()),
            Err(e) => {
                error!("Failed to list Server resources: {}", e);
                error!("Please ensure the Server CRD is installed and the service account can list it");
                return Err(e.into());
            }
        }

        if config.ssh_key_path.is_none() {
            warn!("SSH_KEY_PATH is not set, WoL servers cannot be shut down");
        }

        let backends = PowerBackends {
            wake: Arc::new(UdpWakeSender::new(
                config.wol_default_port,
                config.wol_broadcast_address.clone(),
            )),
            shutdown: Arc::new(SshShutdownExecutor::new(
                config.ssh_key_path.clone(),
                config.ssh_user.clone(),
                config.ssh_timeout,
            )),
            bmc: Arc::new(IpmitoolClient::new(config.ipmitool_path.clone(), config.ipmi_timeout)),
            probe: Arc::new(PingProbe::default()),
        };

        let metrics = Metrics::new()?;
        let reconciler = Arc::new(Reconciler::new(
            store.clone(),
            backends,
            config.requeue_interval,
            config.failure_threshold,
            metrics.clone(),
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let server_watcher = {
            let watcher = Watcher::new(reconciler, server_api, config.resync_interval);
            let shutdown = shutdown_requested(shutdown_rx.clone());
            tokio::spawn(async move { watcher.watch_servers(shutdown).await })
        };

        let grpc_server = {
            let options = config.grpc.clone();
            let store = store.clone();
            let shutdown = shutdown_requested(shutdown_rx.clone());
            tokio::spawn(async move {
                cloud_provider::serve(options, store, shutdown)
                    .await
                    .map_err(ControllerError::from)
            })
        };

        let metrics_server = {
            let metrics = metrics.clone();
            let shutdown = shutdown_requested(shutdown_rx);
            tokio::spawn(crate::metrics::serve(config.metrics_address, metrics, shutdown))
        };

        Ok(Self {
            metrics,
            shutdown_tx,
            server_watcher,
            grpc_server,
            metrics_server,
        })
    }

    /// Runs the controller until `signal` resolves or a task exits.
    pub async fn run<S>(mut self, signal: S) -> Result<(), ControllerError>
    where
        S: Future<Output = ()>,
    {
        info!("Server Power Controller running");
        self.metrics.set_ready(true);

        let result = tokio::select! {
            _ = signal => {
                info!("Shutdown signal received");
                Ok(())
            }
            result = &mut self.server_watcher => task_result("Server watcher", result),
            result = &mut self.grpc_server => task_result("CloudProvider gRPC server", result),
            result = &mut self.metrics_server => task_result("Metrics server", result),
        };

        self.metrics.set_ready(false);
        let _ = self.shutdown_tx.send(true);

        for handle in [self.server_watcher, self.grpc_server, self.metrics_server] {
            if handle.is_finished() {
                continue;
            }
            if tokio::time::timeout(SHUTDOWN_GRACE, handle).await.is_err() {
                warn!("Task did not stop within {:?}", SHUTDOWN_GRACE);
            }
        }

        info!("Server Power Controller stopped");
        result
    }
}
