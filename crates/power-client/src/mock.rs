//! Mock power backends for unit testing
//!
//! Each mock records the calls it receives and can be told to fail, so tests can
//! assert on exactly which power actions a reconciliation issued.

use crate::error::PowerError;
use crate::power_trait::{BmcClient, ReachabilityProbe, ShutdownExecutor, WakeSender};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn injected(message: &Arc<Mutex<Option<String>>>, command: &str) -> Result<(), PowerError> {
    match message.lock().unwrap().clone() {
        Some(detail) => Err(PowerError::CommandFailed {
            command: command.to_string(),
            detail,
        }),
        None => Ok(()),
    }
}

/// A recorded wake call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeCall {
    pub mac: String,
    pub port: u16,
    pub broadcast_address: Option<String>,
}

/// Mock WakeSender
#[derive(Clone, Default)]
pub struct MockWakeSender {
    calls: Arc<Mutex<Vec<WakeCall>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockWakeSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `detail`.
    pub fn fail_with(&self, detail: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(detail.into());
    }

    pub fn calls(&self) -> Vec<WakeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl WakeSender for MockWakeSender {
    async fn wake(&self, mac: &str, port: u16, broadcast_address: Option<&str>) -> Result<(), PowerError> {
        self.calls.lock().unwrap().push(WakeCall {
            mac: mac.to_string(),
            port,
            broadcast_address: broadcast_address.map(str::to_string),
        });
        injected(&self.failure, "wake")
    }
}

/// Mock ShutdownExecutor
#[derive(Clone, Default)]
pub struct MockShutdownExecutor {
    calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockShutdownExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, detail: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(detail.into());
    }

    /// Recorded `(host, user)` pairs.
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ShutdownExecutor for MockShutdownExecutor {
    async fn shutdown(&self, host: &str, user: Option<&str>) -> Result<(), PowerError> {
        self.calls
            .lock()
            .unwrap()
            .push((host.to_string(), user.map(str::to_string)));
        injected(&self.failure, "shutdown")
    }
}

/// BMC operation recorded by [`MockBmcClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmcOperation {
    PowerOn,
    PowerOff,
    Status,
}

/// Mock BmcClient
///
/// Tracks a power flag per BMC address so `get_power_status` reflects earlier calls.
#[derive(Clone, Default)]
pub struct MockBmcClient {
    calls: Arc<Mutex<Vec<(BmcOperation, String)>>>,
    powered: Arc<Mutex<HashMap<String, bool>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockBmcClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, detail: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(detail.into());
    }

    /// Recorded `(operation, address)` pairs.
    pub fn calls(&self) -> Vec<(BmcOperation, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: BmcOperation, address: &str) {
        self.calls.lock().unwrap().push((op, address.to_string()));
    }
}

#[async_trait::async_trait]
impl BmcClient for MockBmcClient {
    async fn power_on(&self, address: &str, _username: &str, _password: &str) -> Result<(), PowerError> {
        self.record(BmcOperation::PowerOn, address);
        injected(&self.failure, "ipmitool chassis power on")?;
        self.powered.lock().unwrap().insert(address.to_string(), true);
        Ok(())
    }

    async fn power_off(&self, address: &str, _username: &str, _password: &str) -> Result<(), PowerError> {
        self.record(BmcOperation::PowerOff, address);
        injected(&self.failure, "ipmitool chassis power off")?;
        self.powered.lock().unwrap().insert(address.to_string(), false);
        Ok(())
    }

    async fn get_power_status(&self, address: &str, _username: &str, _password: &str) -> Result<bool, PowerError> {
        self.record(BmcOperation::Status, address);
        injected(&self.failure, "ipmitool chassis power status")?;
        Ok(self.powered.lock().unwrap().get(address).copied().unwrap_or(false))
    }
}

/// Mock ReachabilityProbe
///
/// Addresses are unreachable until marked otherwise.
#[derive(Clone, Default)]
pub struct MockProbe {
    reachable: Arc<Mutex<HashMap<String, bool>>>,
    probes: Arc<Mutex<Vec<String>>>,
}

impl MockProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reachable(&self, address: impl Into<String>, reachable: bool) {
        self.reachable.lock().unwrap().insert(address.into(), reachable);
    }

    /// Addresses probed so far, in order.
    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ReachabilityProbe for MockProbe {
    async fn is_reachable(&self, address: &str) -> bool {
        self.probes.lock().unwrap().push(address.to_string());
        self.reachable.lock().unwrap().get(address).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_bmc_tracks_power() {
        let bmc = MockBmcClient::new();
        assert!(!bmc.get_power_status("10.0.1.5", "admin", "pw").await.unwrap());

        bmc.power_on("10.0.1.5", "admin", "pw").await.unwrap();
        assert!(bmc.get_power_status("10.0.1.5", "admin", "pw").await.unwrap());
        assert_eq!(bmc.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_wake_failure() {
        let sender = MockWakeSender::new();
        sender.fail_with("network down");

        let result = sender.wake("aa:bb:cc:dd:ee:ff", 9, None).await;
        assert!(matches!(result, Err(PowerError::CommandFailed { .. })));
        assert_eq!(sender.calls().len(), 1);
    }
}
