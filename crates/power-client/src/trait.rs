//! Power capability traits for mocking
//!
//! Each backend is selected per machine by its control method. The reconciler only
//! depends on these traits; concrete implementations live in sibling modules and
//! test doubles in `mock` (behind the `test-util` feature).

use crate::error::PowerError;

/// Sends Wake-on-LAN magic packets.
#[async_trait::async_trait]
pub trait WakeSender: Send + Sync {
    /// Wake the machine with `mac`. A `port` of 0 or a missing broadcast
    /// address fall back to the sender's defaults.
    async fn wake(&self, mac: &str, port: u16, broadcast_address: Option<&str>) -> Result<(), PowerError>;
}

/// Shuts a machine down remotely. Credential material is bound at construction.
#[async_trait::async_trait]
pub trait ShutdownExecutor: Send + Sync {
    /// Shut down `host` as `user` (executor default when `None`).
    async fn shutdown(&self, host: &str, user: Option<&str>) -> Result<(), PowerError>;
}

/// Baseboard management controller operations.
#[async_trait::async_trait]
pub trait BmcClient: Send + Sync {
    async fn power_on(&self, address: &str, username: &str, password: &str) -> Result<(), PowerError>;
    async fn power_off(&self, address: &str, username: &str, password: &str) -> Result<(), PowerError>;
    async fn get_power_status(&self, address: &str, username: &str, password: &str) -> Result<bool, PowerError>;
}

/// Checks whether a host answers on the network.
///
/// Failures of any kind collapse to `false`; retries are the probe's own business.
#[async_trait::async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn is_reachable(&self, address: &str) -> bool;
}
