//! gRPC server for the CloudProvider service

use crate::error::ProviderError;
use crate::pb::cloud_provider_server::CloudProviderServer;
use crate::provider::BareMetalProvider;
use server_store::ServerStore;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tonic::transport::{Certificate, Identity, Server, ServerTlsConfig};
use tracing::info;

/// Default listen address.
pub const DEFAULT_GRPC_ADDRESS: &str = "0.0.0.0:8086";

/// Listen address and optional mutual TLS material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpcServerOptions {
    pub address: String,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub ca_file: Option<PathBuf>,
}

impl Default for GrpcServerOptions {
    fn default() -> Self {
        Self {
            address: DEFAULT_GRPC_ADDRESS.to_string(),
            cert_file: None,
            key_file: None,
            ca_file: None,
        }
    }
}

impl GrpcServerOptions {
    /// Checks the address parses and that TLS files are given all together or not at all.
    pub fn validate(&self) -> Result<SocketAddr, ProviderError> {
        if self.address.is_empty() {
            return Err(ProviderError::Configuration("address is required".to_string()));
        }
        let addr = self
            .address
            .parse::<SocketAddr>()
            .map_err(|e| ProviderError::Configuration(format!("invalid address {}: {}", self.address, e)))?;

        let set = [&self.cert_file, &self.key_file, &self.ca_file]
            .iter()
            .filter(|f| f.is_some())
            .count();
        if set != 0 && set != 3 {
            return Err(ProviderError::Configuration(
                "all TLS options (cert, key, ca) must be set together, or none".to_string(),
            ));
        }

        Ok(addr)
    }

    pub fn is_tls_enabled(&self) -> bool {
        self.cert_file.is_some() && self.key_file.is_some() && self.ca_file.is_some()
    }

    async fn tls_config(&self) -> Result<Option<ServerTlsConfig>, ProviderError> {
        let (Some(cert), Some(key), Some(ca)) = (&self.cert_file, &self.key_file, &self.ca_file) else {
            return Ok(None);
        };

        let read = |path: PathBuf| async move {
            tokio::fs::read(&path)
                .await
                .map_err(|e| ProviderError::Configuration(format!("failed to read {}: {}", path.display(), e)))
        };
        let cert = read(cert.clone()).await?;
        let key = read(key.clone()).await?;
        let ca = read(ca.clone()).await?;

        Ok(Some(
            ServerTlsConfig::new()
                .identity(Identity::from_pem(cert, key))
                .client_ca_root(Certificate::from_pem(ca)),
        ))
    }
}

/// Serve the CloudProvider service until `shutdown` resolves, then drain in-flight calls.
pub async fn serve<F>(options: GrpcServerOptions, store: Arc<dyn ServerStore>, shutdown: F) -> Result<(), ProviderError>
where
    F: Future<Output = ()> + Send,
{
    let addr = options.validate()?;
    let service = CloudProviderServer::new(BareMetalProvider::new(store));

    let mut builder = Server::builder();
    if let Some(tls) = options.tls_config().await? {
        builder = builder.tls_config(tls)?;
        info!("gRPC server using mutual TLS");
    }

    info!("gRPC CloudProvider server listening on {}", addr);
    builder
        .add_service(service)
        .serve_with_shutdown(addr, shutdown)
        .await?;
    info!("gRPC CloudProvider server stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid_and_insecure() {
        let options = GrpcServerOptions::default();
        assert!(options.validate().is_ok());
        assert!(!options.is_tls_enabled());
    }

    #[test]
    fn test_partial_tls_is_rejected() {
        let options = GrpcServerOptions {
            cert_file: Some(PathBuf::from("/tls/tls.crt")),
            key_file: Some(PathBuf::from("/tls/tls.key")),
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(ProviderError::Configuration(_))));
        assert!(!options.is_tls_enabled());
    }

    #[test]
    fn test_full_tls_is_enabled() {
        let options = GrpcServerOptions {
            cert_file: Some(PathBuf::from("/tls/tls.crt")),
            key_file: Some(PathBuf::from("/tls/tls.key")),
            ca_file: Some(PathBuf::from("/tls/ca.crt")),
            ..Default::default()
        };
        assert!(options.validate().is_ok());
        assert!(options.is_tls_enabled());
    }

    #[test]
    fn test_bad_address() {
        let options = GrpcServerOptions {
            address: ":8086".to_string(),
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(ProviderError::Configuration(_))));

        let options = GrpcServerOptions {
            address: String::new(),
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(ProviderError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_missing_tls_files_fail_before_binding() {
        let options = GrpcServerOptions {
            address: "127.0.0.1:0".to_string(),
            cert_file: Some(PathBuf::from("/nonexistent/tls.crt")),
            key_file: Some(PathBuf::from("/nonexistent/tls.key")),
            ca_file: Some(PathBuf::from("/nonexistent/ca.crt")),
        };
        let err = options.tls_config().await.unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }
}
