//! Shared helpers for backends that shell out to system tools.

use crate::error::PowerError;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Runs `program args...` to completion, killing it if it outlives `timeout`.
pub(crate) async fn run_command(
    program: &str,
    args: &[&str],
    envs: &[(&str, &str)],
    timeout: Duration,
) -> Result<Output, PowerError> {
    debug!("Running {} {}", program, args.first().copied().unwrap_or_default());

    let mut command = Command::new(program);
    command
        .args(args)
        .envs(envs.iter().copied())
        .stdin(Stdio::null())
        .kill_on_drop(true);

    match tokio::time::timeout(timeout, command.output()).await {
        Ok(output) => Ok(output?),
        Err(_) => Err(PowerError::Timeout(timeout)),
    }
}

/// Builds a `CommandFailed` error from a finished process.
pub(crate) fn command_failed(program: &str, output: &Output) -> PowerError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = match stderr.trim() {
        "" => format!("exited with {}", output.status),
        msg => msg.to_string(),
    };
    PowerError::CommandFailed {
        command: program.to_string(),
        detail,
    }
}
