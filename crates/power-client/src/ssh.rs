//! SSH shutdown executor.
//!
//! Shells out to the OpenSSH client with a private key bound at construction and
//! runs `sudo shutdown -h now` on the target.

use crate::common::{command_failed, run_command};
use crate::error::PowerError;
use crate::power_trait::ShutdownExecutor;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

const SHUTDOWN_COMMAND: &str = "sudo shutdown -h now";

/// Exit code OpenSSH uses for connection-level errors.
const SSH_CONNECTION_ERROR: i32 = 255;

/// Executes remote shutdowns over SSH.
#[derive(Debug, Clone)]
pub struct SshShutdownExecutor {
    ssh_program: String,
    key_path: Option<PathBuf>,
    default_user: String,
    timeout: Duration,
}

impl SshShutdownExecutor {
    /// Create an executor.
    ///
    /// `key_path` is required for shutdowns to succeed; without it every call
    /// fails with a configuration error so the machine is marked failed with a
    /// readable message instead of hanging on a password prompt.
    pub fn new(key_path: Option<PathBuf>, default_user: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ssh_program: "ssh".to_string(),
            key_path,
            default_user: default_user.into(),
            timeout,
        }
    }

    /// Override the `ssh` binary (useful for wrappers).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.ssh_program = program.into();
        self
    }

    fn args<'a>(&self, key: &'a str, target: &'a str, connect_timeout: &'a str) -> Vec<&'a str> {
        vec![
            "-i", key,
            "-o", "BatchMode=yes",
            "-o", "StrictHostKeyChecking=no",
            "-o", "UserKnownHostsFile=/dev/null",
            "-o", connect_timeout,
            target,
            SHUTDOWN_COMMAND,
        ]
    }
}

/// A session torn down by the remote end is what a successful shutdown looks like.
fn is_dropped_by_shutdown(code: Option<i32>, stderr: &str) -> bool {
    code == Some(SSH_CONNECTION_ERROR) && stderr.contains("closed by remote host")
}

#[async_trait::async_trait]
impl ShutdownExecutor for SshShutdownExecutor {
    async fn shutdown(&self, host: &str, user: Option<&str>) -> Result<(), PowerError> {
        let key = self
            .key_path
            .as_ref()
            .ok_or_else(|| PowerError::Configuration("SSH private key is required".to_string()))?;
        let key = key.to_string_lossy();

        let user = user.filter(|u| !u.is_empty()).unwrap_or(self.default_user.as_str());
        let target = format!("{}@{}", user, host);
        let connect_timeout = format!("ConnectTimeout={}", self.timeout.as_secs().max(1));

        let args = self.args(&key, &target, &connect_timeout);
        let output = run_command(&self.ssh_program, &args, &[], self.timeout + Duration::from_secs(5)).await?;

        if output.status.success() {
            info!("Shutdown issued to {}", target);
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_dropped_by_shutdown(output.status.code(), &stderr) {
            debug!("Connection to {} dropped during shutdown", target);
            info!("Shutdown issued to {}", target);
            return Ok(());
        }

        Err(command_failed(&self.ssh_program, &output))
    }
}
