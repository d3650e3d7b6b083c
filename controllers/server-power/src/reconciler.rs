//! Server reconciliation.
//!
//! Reads one `Server`, runs it through the state machine in [`crate::phase`],
//! issues at most one power action and writes the resulting status back (only
//! when it changed).

use crate::error::ControllerError;
use crate::metrics::Metrics;
use crate::phase::{
    ActionError, Observation, PowerCommand, Precheck, apply_action_result, current_state, observe,
    plan_power_command, precheck,
};
use chrono::Utc;
use crds::{Phase, ServerStatus};
use power_client::{BmcClient, ReachabilityProbe, ShutdownExecutor, WakeSender};
use server_store::ServerStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Power capability backends used by the reconciler.
#[derive(Clone)]
pub struct PowerBackends {
    pub wake: Arc<dyn WakeSender>,
    pub shutdown: Arc<dyn ShutdownExecutor>,
    pub bmc: Arc<dyn BmcClient>,
    pub probe: Arc<dyn ReachabilityProbe>,
}

/// Reconciles `Server` resources.
pub struct Reconciler {
    store: Arc<dyn ServerStore>,
    backends: PowerBackends,
    requeue_interval: Duration,
    failure_threshold: u32,
    metrics: Metrics,
}

fn phase_label(phase: Option<Phase>) -> String {
    phase.map_or_else(|| "unset".to_string(), |p| p.to_string())
}

impl Reconciler {
    /// Creates a new reconciler.
    pub fn new(
        store: Arc<dyn ServerStore>,
        backends: PowerBackends,
        requeue_interval: Duration,
        failure_threshold: u32,
        metrics: Metrics,
    ) -> Self {
        Self {
            store,
            backends,
            requeue_interval,
            failure_threshold,
            metrics,
        }
    }

    /// Reconcile the server named `name`.
    ///
    /// Returns the delay after which it should be checked again, if any.
    pub async fn reconcile(&self, name: &str) -> Result<Option<Duration>, ControllerError> {
        let result = self.reconcile_inner(name).await;
        match &result {
            Ok(Some(_)) => self.metrics.record_reconciliation("requeued"),
            Ok(None) => self.metrics.record_reconciliation("done"),
            Err(e) => self.metrics.record_reconciliation(e.kind()),
        }
        result
    }

    async fn reconcile_inner(&self, name: &str) -> Result<Option<Duration>, ControllerError> {
        let Some(server) = self.store.get(name).await? else {
            debug!("Server {} no longer exists", name);
            return Ok(None);
        };

        let version = server.metadata.resource_version.as_deref();
        let observed = server.status_or_default();
        let mut status = observed.clone();
        let desired = server.spec.desired_power_state();

        let address = match precheck(&server.spec, &mut status, self.failure_threshold) {
            Precheck::Skip => {
                debug!("Server {} is failed, skipping", name);
                return Ok(None);
            }
            Precheck::Frozen => {
                error!(
                    "Server {} reached {} consecutive failures, marking failed",
                    name, status.failure_count
                );
                self.persist(name, version, &observed, &status).await?;
                return Ok(None);
            }
            Precheck::MissingAddress => {
                error!("Server {} has no address configured", name);
                self.persist(name, version, &observed, &status).await?;
                return Err(ControllerError::InvalidConfig(format!(
                    "no address configured for server {}",
                    name
                )));
            }
            Precheck::Proceed(address) => address,
        };

        let reachable = self.backends.probe.is_reachable(address).await;
        debug!("Server {} at {} reachable: {}", name, address, reachable);

        match observe(&mut status, reachable, Utc::now()) {
            Observation::Settled => {
                self.persist(name, version, &observed, &status).await?;
                return Ok(None);
            }
            Observation::Waiting => {
                warn!(
                    "Server {} still {} ({} consecutive failures)",
                    name,
                    phase_label(status.phase),
                    status.failure_count
                );
                self.persist(name, version, &observed, &status).await?;
                return Ok(Some(self.requeue_interval));
            }
            Observation::Observed => {}
        }

        if current_state(&status) == desired {
            self.persist(name, version, &observed, &status).await?;
            return Ok(None);
        }

        info!("Server {} is {}, desired {}", name, phase_label(status.phase), desired);
        let result = match plan_power_command(&server.spec, desired) {
            Ok(command) => self.execute(name, &command).await,
            Err(e) => Err(e),
        };
        apply_action_result(&mut status, desired, &result);
        self.persist(name, version, &observed, &status).await?;

        match result {
            Ok(()) => Ok(Some(self.requeue_interval)),
            Err(e) => {
                error!("Power action for server {} failed: {}", name, e);
                Err(e.into())
            }
        }
    }

    async fn execute(&self, name: &str, command: &PowerCommand) -> Result<(), ActionError> {
        let result = match command {
            PowerCommand::Wake { mac, port, broadcast_address } => {
                self.backends
                    .wake
                    .wake(mac, *port, broadcast_address.as_deref())
                    .await
            }
            PowerCommand::Shutdown { host, user } => self.backends.shutdown.shutdown(host, user.as_deref()).await,
            PowerCommand::BmcOn { address, username, password } => {
                self.backends.bmc.power_on(address, username, password).await
            }
            PowerCommand::BmcOff { address, username, password } => {
                self.backends.bmc.power_off(address, username, password).await
            }
        };

        self.metrics.record_power_action(command.kind(), result.is_ok());
        if result.is_ok() {
            info!("Issued {} for server {}", command.kind(), name);
        }
        result.map_err(ActionError::from)
    }

    /// Writes `status` unless it equals what was read.
    async fn persist(
        &self,
        name: &str,
        version: Option<&str>,
        observed: &ServerStatus,
        status: &ServerStatus,
    ) -> Result<(), ControllerError> {
        if observed == status {
            debug!("Server {} status unchanged", name);
            return Ok(());
        }

        self.store.update_status(name, version, status).await?;
        if observed.phase != status.phase {
            info!(
                "Server {} phase {} -> {}",
                name,
                phase_label(observed.phase),
                phase_label(status.phase)
            );
        }
        Ok(())
    }
}
