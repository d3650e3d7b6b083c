//! Store errors

use thiserror::Error;

/// Errors returned by a [`ServerStore`](crate::ServerStore)
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this name
    #[error("Server not found: {0}")]
    NotFound(String),

    /// The record changed since it was read
    #[error("Conflict updating server {0}: resource version is stale")]
    Conflict(String),

    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),
}

impl StoreError {
    /// Maps a kube API error for `name`, turning 404 and 409 into typed variants.
    pub(crate) fn from_kube(name: &str, err: kube::Error) -> Self {
        match err {
            kube::Error::Api(ref ae) if ae.code == 404 => StoreError::NotFound(name.to_string()),
            kube::Error::Api(ref ae) if ae.code == 409 => StoreError::Conflict(name.to_string()),
            other => StoreError::Kube(other),
        }
    }
}
