//! ICMP reachability probe.

use crate::common::run_command;
use crate::power_trait::ReachabilityProbe;
use std::time::Duration;
use tracing::debug;

/// Pings a host a few times before declaring it unreachable.
#[derive(Debug, Clone)]
pub struct PingProbe {
    program: String,
    attempts: u32,
    attempt_timeout: Duration,
    retry_delay: Duration,
}

impl Default for PingProbe {
    /// Three attempts, two seconds each, half a second apart.
    fn default() -> Self {
        Self {
            program: "ping".to_string(),
            attempts: 3,
            attempt_timeout: Duration::from_secs(2),
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl PingProbe {
    pub fn new(attempts: u32, attempt_timeout: Duration, retry_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            attempt_timeout,
            retry_delay,
            ..Self::default()
        }
    }

    async fn ping_once(&self, address: &str) -> bool {
        let wait = self.attempt_timeout.as_secs().max(1).to_string();
        let args = ["-c", "1", "-W", wait.as_str(), address];
        // ping enforces -W itself; the outer deadline only guards against a hung process.
        match run_command(&self.program, &args, &[], self.attempt_timeout + Duration::from_secs(1)).await {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!("Ping {} failed: {}", address, e);
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl ReachabilityProbe for PingProbe {
    async fn is_reachable(&self, address: &str) -> bool {
        for attempt in 0..self.attempts {
            if self.ping_once(address).await {
                return true;
            }
            if attempt + 1 < self.attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
        debug!("{} unreachable after {} attempts", address, self.attempts);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_ping_binary_is_unreachable() {
        let probe = PingProbe {
            program: "/nonexistent/ping".to_string(),
            ..PingProbe::new(2, Duration::from_millis(10), Duration::from_millis(1))
        };
        assert!(!probe.is_reachable("127.0.0.1").await);
    }
}
