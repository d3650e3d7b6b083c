//! IPMI client backed by `ipmitool`.

use crate::common::{command_failed, run_command};
use crate::error::PowerError;
use crate::power_trait::BmcClient;
use std::time::Duration;
use tracing::info;

/// Drives a BMC through `ipmitool -I lanplus`.
///
/// The password is handed over through `IPMI_PASSWORD` (`-E`) so it never shows
/// up in the process list.
#[derive(Debug, Clone)]
pub struct IpmitoolClient {
    program: String,
    timeout: Duration,
}

impl IpmitoolClient {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    async fn chassis_power(
        &self,
        address: &str,
        username: &str,
        password: &str,
        action: &str,
    ) -> Result<String, PowerError> {
        let args = ["-I", "lanplus", "-H", address, "-U", username, "-E", "chassis", "power", action];
        let output = run_command(&self.program, &args, &[("IPMI_PASSWORD", password)], self.timeout).await?;

        if !output.status.success() {
            return Err(command_failed(&self.program, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parses `Chassis Power is on|off`.
fn parse_power_status(stdout: &str) -> Result<bool, PowerError> {
    let line = stdout.trim().to_ascii_lowercase();
    match line.rsplit(' ').next() {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        _ => Err(PowerError::CommandFailed {
            command: "ipmitool chassis power status".to_string(),
            detail: format!("unexpected output: {}", stdout.trim()),
        }),
    }
}

#[async_trait::async_trait]
impl BmcClient for IpmitoolClient {
    async fn power_on(&self, address: &str, username: &str, password: &str) -> Result<(), PowerError> {
        self.chassis_power(address, username, password, "on").await?;
        info!("BMC {} powered on", address);
        Ok(())
    }

    async fn power_off(&self, address: &str, username: &str, password: &str) -> Result<(), PowerError> {
        self.chassis_power(address, username, password, "off").await?;
        info!("BMC {} powered off", address);
        Ok(())
    }

    async fn get_power_status(&self, address: &str, username: &str, password: &str) -> Result<bool, PowerError> {
        let stdout = self.chassis_power(address, username, password, "status").await?;
        parse_power_status(&stdout)
    }
}
