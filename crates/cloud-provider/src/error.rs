//! CloudProvider errors and their gRPC status mapping

use server_store::StoreError;
use thiserror::Error;
use tonic::Status;

/// Errors that can occur while serving the CloudProvider protocol
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request named a node group other than the single pool
    #[error("Unknown node group: {0}")]
    UnknownNodeGroup(String),

    /// Request named a node with no matching server
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// Not enough powered-off servers to satisfy an increase
    #[error("Could not provision enough servers: requested {requested}, provisioned {provisioned}")]
    InsufficientCapacity {
        requested: usize,
        provisioned: usize,
    },

    /// Malformed request
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Record store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// gRPC transport failure (bind, TLS, serve)
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// Invalid server options
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<ProviderError> for Status {
    fn from(err: ProviderError) -> Self {
        let message = err.to_string();
        match err {
            ProviderError::UnknownNodeGroup(_) | ProviderError::UnknownNode(_) => Status::not_found(message),
            ProviderError::InsufficientCapacity { .. } => Status::resource_exhausted(message),
            ProviderError::InvalidArgument(_) => Status::invalid_argument(message),
            ProviderError::Store(StoreError::Conflict(_)) => Status::aborted(message),
            ProviderError::Store(StoreError::NotFound(_)) => Status::not_found(message),
            ProviderError::Store(_) | ProviderError::Transport(_) | ProviderError::Configuration(_) => {
                Status::internal(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ProviderError::UnknownNodeGroup("x".into()), Code::NotFound),
            (ProviderError::UnknownNode("n".into()), Code::NotFound),
            (
                ProviderError::InsufficientCapacity { requested: 3, provisioned: 1 },
                Code::ResourceExhausted,
            ),
            (ProviderError::InvalidArgument("node is required".into()), Code::InvalidArgument),
            (ProviderError::Store(StoreError::Conflict("n".into())), Code::Aborted),
            (ProviderError::Store(StoreError::NotFound("n".into())), Code::NotFound),
            (ProviderError::Configuration("bad".into()), Code::Internal),
        ];

        for (err, code) in cases {
            assert_eq!(Status::from(err).code(), code);
        }
    }
}
