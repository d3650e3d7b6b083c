//! Power backend errors

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when driving a machine's power or probing it
#[derive(Debug, Error)]
pub enum PowerError {
    /// Socket or process spawn failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// MAC address could not be parsed
    #[error("Invalid MAC address: {0}")]
    InvalidMac(String),

    /// External tool exited unsuccessfully
    #[error("Command `{command}` failed: {detail}")]
    CommandFailed {
        command: String,
        detail: String,
    },

    /// External tool did not finish in time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Backend is missing required configuration (e.g. SSH key)
    #[error("Configuration error: {0}")]
    Configuration(String),
}
