//! ServerStore trait for mocking

use crate::error::StoreError;
use crds::{PowerState, Server, ServerStatus};

/// Access to `Server` records.
///
/// `resource_version` is the version observed by the caller; `None` skips the
/// optimistic concurrency check.
#[async_trait::async_trait]
pub trait ServerStore: Send + Sync {
    /// Fetch one record, `None` when it does not exist.
    async fn get(&self, name: &str) -> Result<Option<Server>, StoreError>;

    /// All records, ordered by name.
    async fn list(&self) -> Result<Vec<Server>, StoreError>;

    /// Set `spec.powerState`.
    async fn update_power_state(
        &self,
        name: &str,
        resource_version: Option<&str>,
        state: PowerState,
    ) -> Result<(), StoreError>;

    /// Replace `status`.
    async fn update_status(
        &self,
        name: &str,
        resource_version: Option<&str>,
        status: &ServerStatus,
    ) -> Result<(), StoreError>;
}
