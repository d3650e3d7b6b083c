//! Kubernetes resource watchers.
//!
//! Drives reconciliation through `kube_runtime::Controller`, which handles
//! reconnection, per-object serialization and requeue timers.

use crate::backoff::FibonacciBackoff;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crds::Server;
use futures::StreamExt;
use kube::{Api, ResourceExt};
use kube_runtime::{Controller, controller::{Action, Config as ControllerConfig}, watcher};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Failure backoffs untouched for this long belong to deleted or recovered
/// objects and are dropped.
const BACKOFF_IDLE_EVICTION: Duration = Duration::from_secs(30 * 60);

/// Per-object Fibonacci backoff for failed reconciliations, reset on success.
#[derive(Debug, Default)]
pub struct ErrorBackoffs {
    backoffs: Mutex<HashMap<String, (FibonacciBackoff, Instant)>>,
}

impl ErrorBackoffs {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, (FibonacciBackoff, Instant)>> {
        self.backoffs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Delay before retrying `key` after another failure at `now`.
    pub fn next(&self, key: &str, now: Instant) -> Duration {
        let mut backoffs = self.lock();
        backoffs.retain(|_, (_, last)| now.saturating_duration_since(*last) < BACKOFF_IDLE_EVICTION);

        let (backoff, last) = backoffs
            .entry(key.to_string())
            .or_insert_with(|| (FibonacciBackoff::default(), now));
        *last = now;
        backoff.next_backoff()
    }

    pub fn reset(&self, key: &str) {
        if let Some((backoff, _)) = self.lock().get_mut(key) {
            backoff.reset();
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Holds back reconciliations triggered by the controller's own status writes.
///
/// After a reconciliation asks to be requeued, further events for the same
/// object and generation are deferred until the requeue is due. A spec change
/// (new generation) always goes through. Entries past their deadline are
/// dropped on the next write, so deleted objects do not linger.
#[derive(Debug, Default)]
pub struct RequeueGate {
    due: Mutex<HashMap<String, (Option<i64>, Instant)>>,
}

impl RequeueGate {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, (Option<i64>, Instant)>> {
        self.due.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Remaining wait for `key` at `generation`, or `None` when it may run now.
    pub fn remaining(&self, key: &str, generation: Option<i64>, now: Instant) -> Option<Duration> {
        let due = self.lock();
        match due.get(key) {
            Some((seen, at)) if *seen == generation && *at > now => Some(*at - now),
            _ => None,
        }
    }

    /// Records the outcome of a reconciliation.
    pub fn record(&self, key: &str, generation: Option<i64>, requeue: Option<Duration>, now: Instant) {
        let mut due = self.lock();
        due.retain(|_, (_, at)| *at > now);
        match requeue {
            Some(after) => {
                due.insert(key.to_string(), (generation, now + after));
            }
            None => {
                due.remove(key);
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Maps a reconciliation result to the controller action. Settled servers are
/// still checked again every `resync` so drift (a machine dying or coming up on
/// its own) is noticed without a watch event.
pub fn next_action(requeue: Option<Duration>, resync: Duration) -> Action {
    Action::requeue(requeue.unwrap_or(resync))
}

type ReconcileFuture = Pin<Box<dyn Future<Output = Result<Action, ControllerError>> + Send>>;

/// Generic watcher helper around `kube_runtime::Controller`.
///
/// Runs until `shutdown` resolves. The error policy requeues with a per-object
/// Fibonacci backoff.
async fn watch_resource<K, C, F, S>(
    api: Api<K>,
    context: Arc<C>,
    reconcile_fn: F,
    backoffs: Arc<ErrorBackoffs>,
    resource_name: &'static str,
    shutdown: S,
) -> Result<(), ControllerError>
where
    K: kube::Resource + Clone + Send + Sync + 'static + std::fmt::Debug + serde::de::DeserializeOwned,
    K::DynamicType: Default + std::cmp::Eq + std::hash::Hash + Clone + std::fmt::Debug + Unpin,
    C: Send + Sync + 'static,
    F: Fn(Arc<C>, Arc<K>) -> ReconcileFuture + Send + Sync + Clone + 'static,
    S: Future<Output = ()> + Send + Sync + 'static,
{
    info!("Starting {} watcher", resource_name);

    let policy_backoffs = backoffs.clone();
    let error_policy = move |obj: Arc<K>, error: &ControllerError, _ctx: Arc<C>| {
        let name = obj.name_any();
        let delay = policy_backoffs.next(&name, Instant::now());
        error!(
            "Reconciliation error for {} {}: {} (retrying in {:?})",
            resource_name, name, error, delay
        );
        Action::requeue(delay)
    };

    let reconcile = move |obj: Arc<K>, ctx: Arc<C>| {
        let reconcile_fn = reconcile_fn.clone();
        let backoffs = backoffs.clone();
        async move {
            let name = obj.name_any();
            debug!("Reconciling {} {}", resource_name, name);
            let action = reconcile_fn(ctx, obj).await?;
            backoffs.reset(&name);
            Ok::<Action, ControllerError>(action)
        }
    };

    let controller_config = ControllerConfig::default()
        .debounce(Duration::from_secs(5))
        .concurrency(8);

    Controller::new(api, watcher::Config::default())
        .with_config(controller_config)
        .graceful_shutdown_on(shutdown)
        .run(reconcile, error_policy, context)
        .for_each(|res| async move {
            if let Err(e) = res {
                debug!("Controller event error for {}: {}", resource_name, e);
            }
        })
        .await;

    info!("{} watcher stopped", resource_name);
    Ok(())
}

/// Shared state for the `Server` watcher.
pub struct ServerContext {
    reconciler: Arc<Reconciler>,
    gate: RequeueGate,
    resync_interval: Duration,
}

/// Watches `Server` resources and reconciles them.
pub struct Watcher {
    context: Arc<ServerContext>,
    api: Api<Server>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(reconciler: Arc<Reconciler>, api: Api<Server>, resync_interval: Duration) -> Self {
        Self {
            context: Arc::new(ServerContext {
                reconciler,
                gate: RequeueGate::default(),
                resync_interval,
            }),
            api,
        }
    }

    /// Watches `Server` resources until `shutdown` resolves.
    pub async fn watch_servers<S>(&self, shutdown: S) -> Result<(), ControllerError>
    where
        S: Future<Output = ()> + Send + Sync + 'static,
    {
        watch_resource(
            self.api.clone(),
            self.context.clone(),
            |ctx: Arc<ServerContext>, server: Arc<Server>| -> ReconcileFuture {
                Box::pin(async move {
                    let name = server.name_any();
                    let generation = server.metadata.generation;

                    if let Some(wait) = ctx.gate.remaining(&name, generation, Instant::now()) {
                        debug!("Server {} requeue not due for {:?}", name, wait);
                        return Ok(Action::requeue(wait));
                    }

                    match ctx.reconciler.reconcile(&name).await {
                        Ok(requeue) => {
                            ctx.gate.record(&name, generation, requeue, Instant::now());
                            Ok(next_action(requeue, ctx.resync_interval))
                        }
                        Err(e) => {
                            ctx.gate.record(&name, generation, None, Instant::now());
                            Err(e)
                        }
                    }
                })
            },
            Arc::new(ErrorBackoffs::default()),
            "Server",
            shutdown,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_backoff_per_object() {
        let backoffs = ErrorBackoffs::default();
        let now = Instant::now();

        assert_eq!(backoffs.next("node-1", now), Duration::from_secs(60));
        assert_eq!(backoffs.next("node-1", now), Duration::from_secs(60));
        assert_eq!(backoffs.next("node-1", now), Duration::from_secs(120));
        assert_eq!(backoffs.next("node-2", now), Duration::from_secs(60));

        backoffs.reset("node-1");
        assert_eq!(backoffs.next("node-1", now), Duration::from_secs(60));
        assert_eq!(backoffs.next("node-1", now), Duration::from_secs(60));
        assert_eq!(backoffs.next("node-1", now), Duration::from_secs(120));
    }

    #[test]
    fn test_error_backoff_evicts_idle_objects() {
        let backoffs = ErrorBackoffs::default();
        let now = Instant::now();

        backoffs.next("deleted", now);
        backoffs.next("deleted", now);
        assert_eq!(backoffs.len(), 1);

        let later = now + BACKOFF_IDLE_EVICTION + Duration::from_secs(1);
        assert_eq!(backoffs.next("node-1", later), Duration::from_secs(60));
        assert_eq!(backoffs.len(), 1);
        assert_eq!(backoffs.next("deleted", later), Duration::from_secs(60));
    }

    #[test]
    fn test_settled_servers_resync() {
        let resync = Duration::from_secs(300);

        assert_eq!(next_action(None, resync), Action::requeue(resync));
        assert_eq!(
            next_action(Some(Duration::from_secs(60)), resync),
            Action::requeue(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_gate_defers_same_generation() {
        let gate = RequeueGate::default();
        let now = Instant::now();

        assert_eq!(gate.remaining("node-1", Some(1), now), None);

        gate.record("node-1", Some(1), Some(Duration::from_secs(60)), now);
        let wait = gate.remaining("node-1", Some(1), now + Duration::from_secs(10));
        assert_eq!(wait, Some(Duration::from_secs(50)));

        assert_eq!(gate.remaining("node-1", Some(1), now + Duration::from_secs(60)), None);
    }

    #[test]
    fn test_gate_lets_spec_changes_through() {
        let gate = RequeueGate::default();
        let now = Instant::now();

        gate.record("node-1", Some(1), Some(Duration::from_secs(60)), now);
        assert_eq!(gate.remaining("node-1", Some(2), now), None);
        assert!(gate.remaining("node-2", Some(1), now).is_none());
    }

    #[test]
    fn test_gate_cleared_when_no_requeue() {
        let gate = RequeueGate::default();
        let now = Instant::now();

        gate.record("node-1", Some(1), Some(Duration::from_secs(60)), now);
        gate.record("node-1", Some(1), None, now);
        assert_eq!(gate.remaining("node-1", Some(1), now), None);
    }

    #[test]
    fn test_gate_drops_expired_entries() {
        let gate = RequeueGate::default();
        let now = Instant::now();

        gate.record("deleted", Some(1), Some(Duration::from_secs(60)), now);
        assert_eq!(gate.len(), 1);

        let later = now + Duration::from_secs(61);
        gate.record("node-1", Some(1), Some(Duration::from_secs(60)), later);
        assert_eq!(gate.len(), 1);
        assert_eq!(gate.remaining("node-1", Some(1), later), Some(Duration::from_secs(60)));
    }
}
