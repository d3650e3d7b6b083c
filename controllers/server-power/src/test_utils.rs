//! Test utilities for unit testing the reconciler
//!
//! Builders for `Server` records and a harness wiring the reconciler to in-memory
//! doubles of the store and every power backend.

#[cfg(test)]
use crate::metrics::Metrics;
#[cfg(test)]
use crate::reconciler::{PowerBackends, Reconciler};
#[cfg(test)]
use crds::*;
#[cfg(test)]
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
#[cfg(test)]
use power_client::{MockBmcClient, MockProbe, MockShutdownExecutor, MockWakeSender};
#[cfg(test)]
use server_store::MockServerStore;
#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
pub const TEST_MAC: &str = "aa:bb:cc:dd:ee:ff";
#[cfg(test)]
pub const TEST_WOL_ADDRESS: &str = "10.0.0.5";
#[cfg(test)]
pub const TEST_BMC_ADDRESS: &str = "10.0.1.5";
#[cfg(test)]
pub const TEST_REQUEUE: Duration = Duration::from_secs(60);

/// Helper to create a test Server driven by Wake-on-LAN + SSH
#[cfg(test)]
pub fn create_test_wol_server(name: &str, desired: Option<PowerState>, phase: Option<Phase>) -> Server {
    create_test_server(
        name,
        ServerSpec {
            power_state: desired,
            control_type: Some(ControlType::Wol),
            control: ControlSpecs {
                wol: Some(WolSpec {
                    address: TEST_WOL_ADDRESS.to_string(),
                    mac_address: TEST_MAC.to_string(),
                    ..Default::default()
                }),
                ipmi: None,
            },
        },
        phase,
    )
}

/// Helper to create a test Server driven over IPMI
#[cfg(test)]
pub fn create_test_ipmi_server(name: &str, desired: Option<PowerState>, phase: Option<Phase>) -> Server {
    create_test_server(
        name,
        ServerSpec {
            power_state: desired,
            control_type: Some(ControlType::Ipmi),
            control: ControlSpecs {
                ipmi: Some(IpmiSpec {
                    address: TEST_BMC_ADDRESS.to_string(),
                    username: "admin".to_string(),
                    password: "secret".to_string(),
                }),
                wol: None,
            },
        },
        phase,
    )
}

/// Helper to create a test Server from an arbitrary spec
#[cfg(test)]
pub fn create_test_server(name: &str, spec: ServerSpec, phase: Option<Phase>) -> Server {
    let mut server = Server::new(name, spec);
    server.metadata = ObjectMeta {
        name: Some(name.to_string()),
        generation: Some(1),
        ..Default::default()
    };
    server.status = phase.map(|phase| ServerStatus {
        phase: Some(phase),
        ..Default::default()
    });
    server
}

/// Reconciler wired to mocks, with handles kept for assertions.
#[cfg(test)]
pub struct TestHarness {
    pub store: MockServerStore,
    pub wake: MockWakeSender,
    pub shutdown: MockShutdownExecutor,
    pub bmc: MockBmcClient,
    pub probe: MockProbe,
    pub metrics: Metrics,
    pub reconciler: Reconciler,
}

#[cfg(test)]
impl TestHarness {
    pub fn new() -> Self {
        Self::with_threshold(crate::phase::DEFAULT_FAILURE_THRESHOLD)
    }

    pub fn with_threshold(threshold: u32) -> Self {
        let store = MockServerStore::new();
        let wake = MockWakeSender::new();
        let shutdown = MockShutdownExecutor::new();
        let bmc = MockBmcClient::new();
        let probe = MockProbe::new();
        let metrics = Metrics::new().unwrap();

        let backends = PowerBackends {
            wake: Arc::new(wake.clone()),
            shutdown: Arc::new(shutdown.clone()),
            bmc: Arc::new(bmc.clone()),
            probe: Arc::new(probe.clone()),
        };
        let reconciler = Reconciler::new(
            Arc::new(store.clone()),
            backends,
            TEST_REQUEUE,
            threshold,
            metrics.clone(),
        );

        Self {
            store,
            wake,
            shutdown,
            bmc,
            probe,
            metrics,
            reconciler,
        }
    }

    /// Current status of `name` in the store.
    pub fn status(&self, name: &str) -> ServerStatus {
        self.store
            .server(name)
            .map(|s| s.status_or_default())
            .unwrap_or_default()
    }
}
