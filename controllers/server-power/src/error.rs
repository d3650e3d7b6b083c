//! Controller-specific error types.

use crate::phase::ActionError;
use cloud_provider::ProviderError;
use kube::Error as KubeError;
use server_store::StoreError;
use thiserror::Error;

/// Errors that can occur in the server power controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Record store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration (process or per-server)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Power action failed
    #[error("Power action failed: {0}")]
    PowerAction(#[from] ActionError),

    /// CloudProvider gRPC server error
    #[error("CloudProvider error: {0}")]
    Provider(#[from] ProviderError),

    /// Metrics registration failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Listener or socket failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}

impl ControllerError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ControllerError::Kube(_) => "kube",
            ControllerError::Store(_) => "store",
            ControllerError::InvalidConfig(_) => "invalid_config",
            ControllerError::PowerAction(_) => "power_action",
            ControllerError::Provider(_) => "provider",
            ControllerError::Metrics(_) => "metrics",
            ControllerError::Io(_) => "io",
            ControllerError::Watch(_) => "watch",
        }
    }
}
