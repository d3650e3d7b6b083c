//! Server CRD
//!
//! One `Server` per physical machine. `spec` carries the desired power state and
//! how to drive the machine; `status` carries the observed lifecycle phase.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Label carrying the GPU type of a machine (counted by the autoscaler GPU queries).
pub const GPU_TYPE_LABEL: &str = "gpu-type";

/// Default UDP port for Wake-on-LAN magic packets.
pub const DEFAULT_WOL_PORT: u16 = 9;

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[kube(
    group = "baremetal.microscaler.io",
    version = "v1alpha1",
    kind = "Server",
    status = "ServerStatus",
    printcolumn = r#"{"name":"Desired", "type":"string", "jsonPath":".spec.powerState"}"#,
    printcolumn = r#"{"name":"Phase", "type":"string", "jsonPath":".status.status"}"#,
    printcolumn = r#"{"name":"Failures", "type":"integer", "jsonPath":".status.failureCount"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ServerSpec {
    /// Desired power state (treated as `off` when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_state: Option<PowerState>,

    /// Control method used to drive the machine
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub control_type: Option<ControlType>,

    /// Method-specific control parameters
    #[serde(default)]
    pub control: ControlSpecs,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    #[default]
    Off,
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::On => write!(f, "on"),
            PowerState::Off => write!(f, "off"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    /// Wake-on-LAN to power on, SSH shutdown to power off
    Wol,

    /// Baseboard management controller over IPMI
    Ipmi,
}

impl std::fmt::Display for ControlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlType::Wol => write!(f, "wol"),
            ControlType::Ipmi => write!(f, "ipmi"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControlSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipmi: Option<IpmiSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wol: Option<WolSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpmiSpec {
    /// BMC address (also probed for reachability)
    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WolSpec {
    /// Host address, used for reachability and SSH shutdown
    #[serde(default)]
    pub address: String,

    /// MAC address the magic packet targets
    #[serde(default)]
    pub mac_address: String,

    /// UDP port for the magic packet
    #[serde(default = "default_wol_port")]
    pub port: u16,

    /// Broadcast address (sender default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast_address: Option<String>,

    /// SSH user for shutdown (executor default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Default for WolSpec {
    fn default() -> Self {
        Self {
            address: String::new(),
            mac_address: String::new(),
            port: DEFAULT_WOL_PORT,
            broadcast_address: None,
            user: None,
        }
    }
}

fn default_wol_port() -> u16 {
    DEFAULT_WOL_PORT
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    /// Observed lifecycle phase (unset until first classification)
    #[serde(default, rename = "status", skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,

    /// Last human-readable error
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// First failure of the current streak
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failing_since: Option<chrono::DateTime<chrono::Utc>>,

    /// Consecutive failures in the current streak
    #[serde(default)]
    pub failure_count: u32,
}

/// Observed power lifecycle phase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Powered on, waiting to become reachable
    Pending,

    /// Reachable and running
    Active,

    /// Unreachable / powered off
    Offline,

    /// Shut down, waiting to become unreachable
    Draining,

    /// Terminal until reset by an operator
    Failed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Pending => "pending",
            Phase::Active => "active",
            Phase::Offline => "offline",
            Phase::Draining => "draining",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}

impl ServerSpec {
    /// Desired power state with the `off` default applied.
    pub fn desired_power_state(&self) -> PowerState {
        self.power_state.unwrap_or_default()
    }

    /// Network address used for reachability, taken from the active control method.
    pub fn address(&self) -> Option<&str> {
        let address = match self.control_type? {
            ControlType::Wol => self.control.wol.as_ref().map(|w| w.address.as_str()),
            ControlType::Ipmi => self.control.ipmi.as_ref().map(|i| i.address.as_str()),
        };
        address.filter(|a| !a.is_empty())
    }
}

impl Server {
    /// Object name (empty string when missing, which the API server never allows).
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Current status or an empty one.
    pub fn status_or_default(&self) -> ServerStatus {
        self.status.clone().unwrap_or_default()
    }

    /// Value of the `gpu-type` label, if any.
    pub fn gpu_type(&self) -> Option<&str> {
        self.metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(GPU_TYPE_LABEL))
            .map(String::as_str)
    }
}
