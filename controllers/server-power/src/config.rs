//! Process configuration from environment variables.

use crate::error::ControllerError;
use crate::phase::DEFAULT_FAILURE_THRESHOLD;
use cloud_provider::GrpcServerOptions;
use cloud_provider::server::DEFAULT_GRPC_ADDRESS;
use crds::DEFAULT_WOL_PORT;
use power_client::DEFAULT_BROADCAST_ADDRESS;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_REQUEUE_INTERVAL_SECS: u64 = 60;
const DEFAULT_RESYNC_INTERVAL_SECS: u64 = 300;
const DEFAULT_SSH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_IPMI_TIMEOUT_SECS: u64 = 20;
const DEFAULT_METRICS_ADDRESS: &str = "0.0.0.0:8080";

/// Everything the controller reads from its environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub grpc: GrpcServerOptions,
    pub requeue_interval: Duration,
    /// How often a settled server is probed again for drift
    pub resync_interval: Duration,
    pub failure_threshold: u32,
    pub wol_default_port: u16,
    pub wol_broadcast_address: String,
    pub ssh_user: String,
    pub ssh_key_path: Option<PathBuf>,
    pub ssh_timeout: Duration,
    pub ipmitool_path: String,
    pub ipmi_timeout: Duration,
    pub metrics_address: SocketAddr,
}

fn parse<T: FromStr>(name: &str, value: Option<String>, default: T) -> Result<T, ControllerError>
where
    T::Err: std::fmt::Display,
{
    match value.filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse()
            .map_err(|e| ControllerError::InvalidConfig(format!("{}={}: {}", name, v, e))),
        None => Ok(default),
    }
}

fn parse_address(name: &str, value: &str) -> Result<SocketAddr, ControllerError> {
    value
        .parse()
        .map_err(|e| ControllerError::InvalidConfig(format!("{}={}: {}", name, value, e)))
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup` (unset variables return `None`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |name: &str| lookup(name).filter(|v| !v.is_empty()).map(PathBuf::from);

        let grpc = GrpcServerOptions {
            address: lookup("GRPC_ADDRESS")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_GRPC_ADDRESS.to_string()),
            cert_file: path("GRPC_TLS_CERT"),
            key_file: path("GRPC_TLS_KEY"),
            ca_file: path("GRPC_TLS_CA"),
        };
        grpc.validate()
            .map_err(|e| ControllerError::InvalidConfig(e.to_string()))?;

        let requeue_secs = parse("REQUEUE_INTERVAL_SECS", lookup("REQUEUE_INTERVAL_SECS"), DEFAULT_REQUEUE_INTERVAL_SECS)?;
        if requeue_secs == 0 {
            return Err(ControllerError::InvalidConfig(
                "REQUEUE_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let resync_secs = parse("RESYNC_INTERVAL_SECS", lookup("RESYNC_INTERVAL_SECS"), DEFAULT_RESYNC_INTERVAL_SECS)?;
        if resync_secs == 0 {
            return Err(ControllerError::InvalidConfig(
                "RESYNC_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let failure_threshold = parse("FAILURE_THRESHOLD", lookup("FAILURE_THRESHOLD"), DEFAULT_FAILURE_THRESHOLD)?;
        if failure_threshold == 0 {
            return Err(ControllerError::InvalidConfig(
                "FAILURE_THRESHOLD must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            grpc,
            requeue_interval: Duration::from_secs(requeue_secs),
            resync_interval: Duration::from_secs(resync_secs),
            failure_threshold,
            wol_default_port: parse("WOL_DEFAULT_PORT", lookup("WOL_DEFAULT_PORT"), DEFAULT_WOL_PORT)?,
            wol_broadcast_address: lookup("WOL_BROADCAST_ADDRESS")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_BROADCAST_ADDRESS.to_string()),
            ssh_user: lookup("SSH_USER")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "root".to_string()),
            ssh_key_path: path("SSH_KEY_PATH"),
            ssh_timeout: Duration::from_secs(parse(
                "SSH_TIMEOUT_SECS",
                lookup("SSH_TIMEOUT_SECS"),
                DEFAULT_SSH_TIMEOUT_SECS,
            )?),
            ipmitool_path: lookup("IPMITOOL_PATH")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "ipmitool".to_string()),
            ipmi_timeout: Duration::from_secs(parse(
                "IPMI_TIMEOUT_SECS",
                lookup("IPMI_TIMEOUT_SECS"),
                DEFAULT_IPMI_TIMEOUT_SECS,
            )?),
            metrics_address: parse_address(
                "METRICS_ADDRESS",
                lookup("METRICS_ADDRESS")
                    .filter(|v| !v.is_empty())
                    .as_deref()
                    .unwrap_or(DEFAULT_METRICS_ADDRESS),
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ControllerError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.grpc.address, "0.0.0.0:8086");
        assert!(!config.grpc.is_tls_enabled());
        assert_eq!(config.requeue_interval, Duration::from_secs(60));
        assert_eq!(config.resync_interval, Duration::from_secs(300));
        assert_eq!(config.failure_threshold, 3);
        assert_eq!(config.wol_default_port, 9);
        assert_eq!(config.wol_broadcast_address, "255.255.255.255");
        assert_eq!(config.ssh_user, "root");
        assert_eq!(config.ssh_key_path, None);
        assert_eq!(config.ipmitool_path, "ipmitool");
        assert_eq!(config.ipmi_timeout, Duration::from_secs(20));
        assert_eq!(config.metrics_address.to_string(), DEFAULT_METRICS_ADDRESS);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("GRPC_ADDRESS", "127.0.0.1:9000"),
            ("REQUEUE_INTERVAL_SECS", "30"),
            ("RESYNC_INTERVAL_SECS", "120"),
            ("FAILURE_THRESHOLD", "5"),
            ("SSH_KEY_PATH", "/etc/ssh-key/id_ed25519"),
            ("GRPC_TLS_CERT", "/tls/tls.crt"),
            ("GRPC_TLS_KEY", "/tls/tls.key"),
            ("GRPC_TLS_CA", "/tls/ca.crt"),
        ])
        .unwrap();

        assert_eq!(config.grpc.address, "127.0.0.1:9000");
        assert!(config.grpc.is_tls_enabled());
        assert_eq!(config.requeue_interval, Duration::from_secs(30));
        assert_eq!(config.resync_interval, Duration::from_secs(120));
        assert_eq!(config.failure_threshold, 5);
        assert_eq!(config.ssh_key_path, Some(PathBuf::from("/etc/ssh-key/id_ed25519")));
    }

    #[test]
    fn test_partial_tls_rejected() {
        let err = load(&[("GRPC_TLS_CERT", "/tls/tls.crt")]).unwrap_err();
        assert!(matches!(err, ControllerError::InvalidConfig(_)));
    }

    #[test]
    fn test_bad_numbers_rejected() {
        assert!(matches!(
            load(&[("FAILURE_THRESHOLD", "three")]),
            Err(ControllerError::InvalidConfig(_))
        ));
        assert!(matches!(
            load(&[("FAILURE_THRESHOLD", "0")]),
            Err(ControllerError::InvalidConfig(_))
        ));
        assert!(matches!(
            load(&[("REQUEUE_INTERVAL_SECS", "0")]),
            Err(ControllerError::InvalidConfig(_))
        ));
        assert!(matches!(
            load(&[("RESYNC_INTERVAL_SECS", "0")]),
            Err(ControllerError::InvalidConfig(_))
        ));
    }
}
