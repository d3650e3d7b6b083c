//! Server record store
//!
//! The power controller and the autoscaler adapter only talk to machines through
//! [`ServerStore`]. Each side has exactly one write operation: the adapter changes
//! the desired power state, the controller writes status. Both writes carry the
//! resource version the caller read so concurrent writers conflict instead of
//! silently overwriting each other.

pub mod error;
pub mod kube_store;
#[path = "trait.rs"]
pub mod store_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use error::StoreError;
pub use kube_store::KubeServerStore;
pub use store_trait::ServerStore;
#[cfg(feature = "test-util")]
pub use mock::MockServerStore;
