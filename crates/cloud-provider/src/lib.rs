//! Bare-metal CloudProvider for the cluster autoscaler
//!
//! Serves the cluster-autoscaler `externalgrpc` protocol for a single pool of
//! physical machines. Scaling requests only flip `spec.powerState` on `Server`
//! records; the power controller does the actual work.
//!
//! # Example
//!
//! ```no_run
//! use cloud_provider::{GrpcServerOptions, serve};
//! use server_store::ServerStore;
//! use std::sync::Arc;
//!
//! # async fn example(store: Arc<dyn ServerStore>) -> Result<(), cloud_provider::ProviderError> {
//! serve(GrpcServerOptions::default(), store, std::future::pending()).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod provider;
pub mod server;

/// Generated protobuf messages and service stubs.
#[allow(clippy::all, missing_docs)]
pub mod pb {
    include!("generated/clusterautoscaler.cloudprovider.v1.externalgrpc.rs");
}

pub use error::ProviderError;
pub use provider::{BareMetalProvider, GPU_LABEL, NODE_GROUP_ID};
pub use server::{GrpcServerOptions, serve};

#[cfg(test)]
mod provider_test;
