//! Bare-metal CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the server power controller.

pub mod server;

pub use server::*;
