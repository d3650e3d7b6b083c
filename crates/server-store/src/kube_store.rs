//! Kubernetes-backed ServerStore

use crate::error::StoreError;
use crate::store_trait::ServerStore;
use crds::{PowerState, Server, ServerStatus};
use kube::api::{ListParams, Patch, PatchParams};
use kube::{Api, Client};
use serde_json::{Value, json};
use tracing::debug;

/// Stores `Server` records as cluster-scoped custom resources.
#[derive(Clone)]
pub struct KubeServerStore {
    api: Api<Server>,
}

impl std::fmt::Debug for KubeServerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeServerStore").finish_non_exhaustive()
    }
}

impl KubeServerStore {
    pub fn new(client: Client) -> Self {
        Self { api: Api::all(client) }
    }

    /// The underlying API handle, shared with the controller's watcher.
    pub fn api(&self) -> Api<Server> {
        self.api.clone()
    }
}

/// Merge patch for `spec.powerState`.
pub fn power_state_patch(resource_version: Option<&str>, state: PowerState) -> Value {
    let mut patch = json!({
        "spec": { "powerState": state.to_string() }
    });
    with_resource_version(&mut patch, resource_version);
    patch
}

/// Merge patch for the whole status.
///
/// Every field is written, with explicit nulls, so a merge patch clears values the
/// new status no longer carries (a reset `failingSince`, a cleared message).
pub fn status_patch(resource_version: Option<&str>, status: &ServerStatus) -> Value {
    let message = if status.message.is_empty() {
        Value::Null
    } else {
        Value::String(status.message.clone())
    };
    let mut patch = json!({
        "status": {
            "status": status.phase.map(|p| p.to_string()),
            "message": message,
            "failingSince": status.failing_since.map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
            "failureCount": status.failure_count,
        }
    });
    with_resource_version(&mut patch, resource_version);
    patch
}

fn with_resource_version(patch: &mut Value, resource_version: Option<&str>) {
    if let (Some(version), Some(obj)) = (resource_version, patch.as_object_mut()) {
        obj.insert("metadata".to_string(), json!({ "resourceVersion": version }));
    }
}

#[async_trait::async_trait]
impl ServerStore for KubeServerStore {
    async fn get(&self, name: &str) -> Result<Option<Server>, StoreError> {
        self.api
            .get_opt(name)
            .await
            .map_err(|e| StoreError::from_kube(name, e))
    }

    async fn list(&self) -> Result<Vec<Server>, StoreError> {
        let mut servers = self.api.list(&ListParams::default()).await?.items;
        servers.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(servers)
    }

    async fn update_power_state(
        &self,
        name: &str,
        resource_version: Option<&str>,
        state: PowerState,
    ) -> Result<(), StoreError> {
        let patch = power_state_patch(resource_version, state);
        self.api
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| StoreError::from_kube(name, e))?;
        debug!("Set desired power state of {} to {}", name, state);
        Ok(())
    }

    async fn update_status(
        &self,
        name: &str,
        resource_version: Option<&str>,
        status: &ServerStatus,
    ) -> Result<(), StoreError> {
        let patch = status_patch(resource_version, status);
        self.api
            .patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| StoreError::from_kube(name, e))?;
        debug!("Updated status of {}", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crds::Phase;

    #[test]
    fn test_power_state_patch() {
        let patch = power_state_patch(Some("42"), PowerState::On);
        assert_eq!(patch["spec"]["powerState"], "on");
        assert_eq!(patch["metadata"]["resourceVersion"], "42");

        let patch = power_state_patch(None, PowerState::Off);
        assert_eq!(patch["spec"]["powerState"], "off");
        assert!(patch.get("metadata").is_none());
    }

    #[test]
    fn test_status_patch_writes_explicit_nulls() {
        let status = ServerStatus {
            phase: Some(Phase::Active),
            ..Default::default()
        };
        let patch = status_patch(Some("7"), &status);

        assert_eq!(patch["status"]["status"], "active");
        assert_eq!(patch["status"]["failureCount"], 0);
        assert!(patch["status"]["failingSince"].is_null());
        assert!(patch["status"]["message"].is_null());
        assert!(patch["status"].as_object().unwrap().contains_key("failingSince"));
    }

    #[test]
    fn test_status_patch_failure_streak() {
        let since = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let status = ServerStatus {
            phase: Some(Phase::Pending),
            message: String::new(),
            failing_since: Some(since),
            failure_count: 2,
        };
        let patch = status_patch(None, &status);

        assert_eq!(patch["status"]["failingSince"], "2024-05-01T12:00:00Z");
        assert_eq!(patch["status"]["failureCount"], 2);
    }
}
