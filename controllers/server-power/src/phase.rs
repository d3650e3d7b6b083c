//! Power lifecycle state machine.
//!
//! Pure functions over a server's spec and status. The reconciler feeds them the
//! probe result and the outcome of any power action and persists whatever status
//! they leave behind.
//!
//! ```text
//!            wake / bmc on                reachable
//!   offline ───────────────▶ pending ─────────────────▶ active
//!      ▲                        │ unreachable (streak++)   │
//!      │ unreachable            ▼                          │ shutdown / bmc off
//!   draining ◀────────────────────────────────────────────┘
//!      │ reachable (streak++)
//!      ▼
//!   failed (streak ≥ threshold, bad config, failed action)
//! ```

use chrono::{DateTime, Utc};
use crds::{ControlType, Phase, PowerState, ServerSpec, ServerStatus};
use power_client::PowerError;
use thiserror::Error;

/// Consecutive failures after which a server is marked failed.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Why a power action could not be carried out.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Control parameters are missing or incomplete
    #[error("{0}")]
    Config(String),

    /// The backend reported a failure
    #[error(transparent)]
    Power(#[from] PowerError),
}

/// A fully validated power action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerCommand {
    Wake {
        mac: String,
        port: u16,
        broadcast_address: Option<String>,
    },
    Shutdown {
        host: String,
        user: Option<String>,
    },
    BmcOn {
        address: String,
        username: String,
        password: String,
    },
    BmcOff {
        address: String,
        username: String,
        password: String,
    },
}

impl PowerCommand {
    /// Metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            PowerCommand::Wake { .. } => "wake",
            PowerCommand::Shutdown { .. } => "shutdown",
            PowerCommand::BmcOn { .. } => "bmc_on",
            PowerCommand::BmcOff { .. } => "bmc_off",
        }
    }
}

/// Outcome of the checks that run before the machine is probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precheck<'a> {
    /// Already failed; leave it alone.
    Skip,
    /// Streak reached the threshold; status now failed.
    Frozen,
    /// No address to probe; status now failed.
    MissingAddress,
    /// Probe this address.
    Proceed(&'a str),
}

pub fn precheck<'a>(spec: &'a ServerSpec, status: &mut ServerStatus, threshold: u32) -> Precheck<'a> {
    if status.phase == Some(Phase::Failed) {
        return Precheck::Skip;
    }

    if status.failure_count >= threshold {
        status.phase = Some(Phase::Failed);
        status.message = format!("Failure threshold reached after {} consecutive failures", status.failure_count);
        return Precheck::Frozen;
    }

    match spec.address() {
        Some(address) => Precheck::Proceed(address),
        None => {
            status.phase = Some(Phase::Failed);
            status.message = "No address configured for server".to_string();
            Precheck::MissingAddress
        }
    }
}

/// What the reconciler should do after folding in the probe result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// A pending or draining transition completed; nothing more this round.
    Settled,
    /// Still waiting on a pending or draining transition; check again later.
    Waiting,
    /// Phase reflects the machine; compare with the desired state.
    Observed,
}

fn clear_streak(status: &mut ServerStatus, phase: Phase) {
    status.phase = Some(phase);
    status.failing_since = None;
    status.failure_count = 0;
    status.message.clear();
}

fn record_failure(status: &mut ServerStatus, now: DateTime<Utc>) {
    if status.failing_since.is_none() {
        status.failing_since = Some(now);
    }
    status.failure_count = status.failure_count.saturating_add(1);
}

/// Advances the phase from a reachability result.
pub fn observe(status: &mut ServerStatus, reachable: bool, now: DateTime<Utc>) -> Observation {
    match status.phase {
        Some(Phase::Pending) => {
            if reachable {
                clear_streak(status, Phase::Active);
                Observation::Settled
            } else {
                record_failure(status, now);
                Observation::Waiting
            }
        }
        Some(Phase::Draining) => {
            if reachable {
                record_failure(status, now);
                Observation::Waiting
            } else {
                clear_streak(status, Phase::Offline);
                Observation::Settled
            }
        }
        Some(Phase::Active) => {
            if !reachable {
                status.phase = Some(Phase::Offline);
            }
            Observation::Observed
        }
        Some(Phase::Offline) | None => {
            status.phase = Some(if reachable { Phase::Active } else { Phase::Offline });
            Observation::Observed
        }
        Some(Phase::Failed) => Observation::Settled,
    }
}

/// Power state implied by the phase.
pub fn current_state(status: &ServerStatus) -> PowerState {
    match status.phase {
        Some(Phase::Active | Phase::Pending) => PowerState::On,
        _ => PowerState::Off,
    }
}

fn config_error(msg: &str) -> ActionError {
    ActionError::Config(msg.to_string())
}

/// Validates control parameters and picks the command that moves toward `desired`.
pub fn plan_power_command(spec: &ServerSpec, desired: PowerState) -> Result<PowerCommand, ActionError> {
    let control_type = spec
        .control_type
        .ok_or_else(|| config_error("control type is required"))?;

    match control_type {
        ControlType::Wol => {
            let wol = spec
                .control
                .wol
                .as_ref()
                .ok_or_else(|| config_error("WOL config is required"))?;
            match desired {
                PowerState::On => {
                    if wol.mac_address.is_empty() {
                        return Err(config_error("WOL MAC address is required"));
                    }
                    Ok(PowerCommand::Wake {
                        mac: wol.mac_address.clone(),
                        port: wol.port,
                        broadcast_address: wol.broadcast_address.clone(),
                    })
                }
                PowerState::Off => {
                    if wol.address.is_empty() {
                        return Err(config_error("WOL address is required"));
                    }
                    Ok(PowerCommand::Shutdown {
                        host: wol.address.clone(),
                        user: wol.user.clone().filter(|u| !u.is_empty()),
                    })
                }
            }
        }
        ControlType::Ipmi => {
            let ipmi = spec
                .control
                .ipmi
                .as_ref()
                .ok_or_else(|| config_error("IPMI config is required"))?;
            if ipmi.address.is_empty() {
                return Err(config_error("IPMI address is required"));
            }
            if ipmi.username.is_empty() || ipmi.password.is_empty() {
                return Err(config_error("IPMI username and password are required"));
            }
            let (address, username, password) = (ipmi.address.clone(), ipmi.username.clone(), ipmi.password.clone());
            Ok(match desired {
                PowerState::On => PowerCommand::BmcOn { address, username, password },
                PowerState::Off => PowerCommand::BmcOff { address, username, password },
            })
        }
    }
}

/// Folds the outcome of a power action toward `desired` into the status.
pub fn apply_action_result(status: &mut ServerStatus, desired: PowerState, result: &Result<(), ActionError>) {
    match result {
        Ok(()) => {
            status.phase = Some(match desired {
                PowerState::On => Phase::Pending,
                PowerState::Off => Phase::Draining,
            });
            status.message.clear();
        }
        Err(e) => {
            status.phase = Some(Phase::Failed);
            status.message = format!("Power action failed: {}", e);
        }
    }
}
