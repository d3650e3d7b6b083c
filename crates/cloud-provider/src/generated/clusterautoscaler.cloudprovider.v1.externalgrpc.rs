// @generated
// Generated from: proto/externalgrpc.proto
// Manual check-in for offline builds.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroup {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(int32, tag = "2")]
    pub min_size: i32,
    #[prost(int32, tag = "3")]
    pub max_size: i32,
    #[prost(string, tag = "4")]
    pub debug: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExternalGrpcNode {
    #[prost(string, tag = "1")]
    pub provider_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(map = "string, string", tag = "3")]
    pub labels:
        ::std::collections::HashMap<::prost::alloc::string::String, ::prost::alloc::string::String>,
    #[prost(map = "string, string", tag = "4")]
    pub annotations:
        ::std::collections::HashMap<::prost::alloc::string::String, ::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupsResponse {
    #[prost(message, repeated, tag = "1")]
    pub node_groups: ::prost::alloc::vec::Vec<NodeGroup>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupForNodeRequest {
    #[prost(message, optional, tag = "1")]
    pub node: ::core::option::Option<ExternalGrpcNode>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupForNodeResponse {
    #[prost(message, optional, tag = "1")]
    pub node_group: ::core::option::Option<NodeGroup>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GpuLabelRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GpuLabelResponse {
    #[prost(string, tag = "1")]
    pub label: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAvailableGpuTypesRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAvailableGpuTypesResponse {
    #[prost(map = "string, message", tag = "1")]
    pub gpu_types: ::std::collections::HashMap<::prost::alloc::string::String, ::prost_types::Any>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CleanupRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CleanupResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RefreshRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RefreshResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupTargetSizeRequest {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupTargetSizeResponse {
    #[prost(int32, tag = "1")]
    pub target_size: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupIncreaseSizeRequest {
    #[prost(int32, tag = "1")]
    pub delta: i32,
    #[prost(string, tag = "2")]
    pub id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupIncreaseSizeResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupDeleteNodesRequest {
    #[prost(message, repeated, tag = "1")]
    pub nodes: ::prost::alloc::vec::Vec<ExternalGrpcNode>,
    #[prost(string, tag = "2")]
    pub id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupDeleteNodesResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupDecreaseTargetSizeRequest {
    #[prost(int32, tag = "1")]
    pub delta: i32,
    #[prost(string, tag = "2")]
    pub id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupDecreaseTargetSizeResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupNodesRequest {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeGroupNodesResponse {
    #[prost(message, repeated, tag = "1")]
    pub instances: ::prost::alloc::vec::Vec<Instance>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Instance {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub status: ::core::option::Option<InstanceStatus>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InstanceStatus {
    #[prost(enumeration = "instance_status::InstanceState", tag = "1")]
    pub instance_state: i32,
    #[prost(message, optional, tag = "2")]
    pub error_info: ::core::option::Option<InstanceErrorInfo>,
}

pub mod instance_status {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum InstanceState {
        Unspecified = 0,
        InstanceRunning = 1,
        InstanceCreating = 2,
        InstanceDeleting = 3,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InstanceErrorInfo {
    #[prost(string, tag = "1")]
    pub error_code: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub error_message: ::prost::alloc::string::String,
    #[prost(int32, tag = "3")]
    pub instance_error_class: i32,
}

pub mod cloud_provider_client {
    #![allow(clippy::derive_partial_eq_without_eq)]
    use tonic::codegen::*;

    #[derive(Debug, Clone)]
    pub struct CloudProviderClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl CloudProviderClient<tonic::transport::Channel> {
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }

    impl<T> CloudProviderClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
        <T::ResponseBody as Body>::Data: Into<Bytes> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        pub async fn node_groups(
            &mut self,
            request: impl tonic::IntoRequest<super::NodeGroupsRequest>,
        ) -> Result<tonic::Response<super::NodeGroupsResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroups",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn node_group_for_node(
            &mut self,
            request: impl tonic::IntoRequest<super::NodeGroupForNodeRequest>,
        ) -> Result<tonic::Response<super::NodeGroupForNodeResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupForNode",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn gpu_label(
            &mut self,
            request: impl tonic::IntoRequest<super::GpuLabelRequest>,
        ) -> Result<tonic::Response<super::GpuLabelResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/GPULabel",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn get_available_gpu_types(
            &mut self,
            request: impl tonic::IntoRequest<super::GetAvailableGpuTypesRequest>,
        ) -> Result<tonic::Response<super::GetAvailableGpuTypesResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/GetAvailableGPUTypes",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn cleanup(
            &mut self,
            request: impl tonic::IntoRequest<super::CleanupRequest>,
        ) -> Result<tonic::Response<super::CleanupResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/Cleanup",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn refresh(
            &mut self,
            request: impl tonic::IntoRequest<super::RefreshRequest>,
        ) -> Result<tonic::Response<super::RefreshResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/Refresh",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn node_group_target_size(
            &mut self,
            request: impl tonic::IntoRequest<super::NodeGroupTargetSizeRequest>,
        ) -> Result<tonic::Response<super::NodeGroupTargetSizeResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupTargetSize",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn node_group_increase_size(
            &mut self,
            request: impl tonic::IntoRequest<super::NodeGroupIncreaseSizeRequest>,
        ) -> Result<tonic::Response<super::NodeGroupIncreaseSizeResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupIncreaseSize",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn node_group_delete_nodes(
            &mut self,
            request: impl tonic::IntoRequest<super::NodeGroupDeleteNodesRequest>,
        ) -> Result<tonic::Response<super::NodeGroupDeleteNodesResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupDeleteNodes",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn node_group_decrease_target_size(
            &mut self,
            request: impl tonic::IntoRequest<super::NodeGroupDecreaseTargetSizeRequest>,
        ) -> Result<tonic::Response<super::NodeGroupDecreaseTargetSizeResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupDecreaseTargetSize",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn node_group_nodes(
            &mut self,
            request: impl tonic::IntoRequest<super::NodeGroupNodesRequest>,
        ) -> Result<tonic::Response<super::NodeGroupNodesResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupNodes",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
}

pub mod cloud_provider_server {
    #![allow(clippy::derive_partial_eq_without_eq)]
    use tonic::codegen::*;

    #[tonic::async_trait]
    pub trait CloudProvider: Send + Sync + 'static {
        async fn node_groups(
            &self,
            request: tonic::Request<super::NodeGroupsRequest>,
        ) -> Result<tonic::Response<super::NodeGroupsResponse>, tonic::Status>;
        async fn node_group_for_node(
            &self,
            request: tonic::Request<super::NodeGroupForNodeRequest>,
        ) -> Result<tonic::Response<super::NodeGroupForNodeResponse>, tonic::Status>;
        async fn gpu_label(
            &self,
            request: tonic::Request<super::GpuLabelRequest>,
        ) -> Result<tonic::Response<super::GpuLabelResponse>, tonic::Status>;
        async fn get_available_gpu_types(
            &self,
            request: tonic::Request<super::GetAvailableGpuTypesRequest>,
        ) -> Result<tonic::Response<super::GetAvailableGpuTypesResponse>, tonic::Status>;
        async fn cleanup(
            &self,
            request: tonic::Request<super::CleanupRequest>,
        ) -> Result<tonic::Response<super::CleanupResponse>, tonic::Status>;
        async fn refresh(
            &self,
            request: tonic::Request<super::RefreshRequest>,
        ) -> Result<tonic::Response<super::RefreshResponse>, tonic::Status>;
        async fn node_group_target_size(
            &self,
            request: tonic::Request<super::NodeGroupTargetSizeRequest>,
        ) -> Result<tonic::Response<super::NodeGroupTargetSizeResponse>, tonic::Status>;
        async fn node_group_increase_size(
            &self,
            request: tonic::Request<super::NodeGroupIncreaseSizeRequest>,
        ) -> Result<tonic::Response<super::NodeGroupIncreaseSizeResponse>, tonic::Status>;
        async fn node_group_delete_nodes(
            &self,
            request: tonic::Request<super::NodeGroupDeleteNodesRequest>,
        ) -> Result<tonic::Response<super::NodeGroupDeleteNodesResponse>, tonic::Status>;
        async fn node_group_decrease_target_size(
            &self,
            request: tonic::Request<super::NodeGroupDecreaseTargetSizeRequest>,
        ) -> Result<tonic::Response<super::NodeGroupDecreaseTargetSizeResponse>, tonic::Status>;
        async fn node_group_nodes(
            &self,
            request: tonic::Request<super::NodeGroupNodesRequest>,
        ) -> Result<tonic::Response<super::NodeGroupNodesResponse>, tonic::Status>;
    }

    #[derive(Debug, Clone)]
    pub struct CloudProviderServer<T: CloudProvider> {
        inner: Arc<T>,
    }

    impl<T: CloudProvider> CloudProviderServer<T> {
        pub fn new(inner: T) -> Self {
            Self {
                inner: Arc::new(inner),
            }
        }

        pub fn from_arc(inner: Arc<T>) -> Self {
            Self { inner }
        }
    }

    impl<T: CloudProvider> Service<http::Request<tonic::body::BoxBody>> for CloudProviderServer<T> {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<tonic::body::BoxBody>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroups" => {
                    struct NodeGroupsSvc<T: CloudProvider>(pub Arc<T>);
                    impl<T: CloudProvider> tonic::server::UnaryService<super::NodeGroupsRequest> for NodeGroupsSvc<T> {
                        type Response = super::NodeGroupsResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::NodeGroupsRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.node_groups(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = NodeGroupsSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupForNode" => {
                    struct NodeGroupForNodeSvc<T: CloudProvider>(pub Arc<T>);
                    impl<T: CloudProvider> tonic::server::UnaryService<super::NodeGroupForNodeRequest> for NodeGroupForNodeSvc<T> {
                        type Response = super::NodeGroupForNodeResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::NodeGroupForNodeRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.node_group_for_node(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = NodeGroupForNodeSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/GPULabel" => {
                    struct GPULabelSvc<T: CloudProvider>(pub Arc<T>);
                    impl<T: CloudProvider> tonic::server::UnaryService<super::GpuLabelRequest> for GPULabelSvc<T> {
                        type Response = super::GpuLabelResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::GpuLabelRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.gpu_label(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = GPULabelSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/GetAvailableGPUTypes" => {
                    struct GetAvailableGPUTypesSvc<T: CloudProvider>(pub Arc<T>);
                    impl<T: CloudProvider> tonic::server::UnaryService<super::GetAvailableGpuTypesRequest> for GetAvailableGPUTypesSvc<T> {
                        type Response = super::GetAvailableGpuTypesResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::GetAvailableGpuTypesRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.get_available_gpu_types(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = GetAvailableGPUTypesSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/Cleanup" => {
                    struct CleanupSvc<T: CloudProvider>(pub Arc<T>);
                    impl<T: CloudProvider> tonic::server::UnaryService<super::CleanupRequest> for CleanupSvc<T> {
                        type Response = super::CleanupResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::CleanupRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.cleanup(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = CleanupSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/Refresh" => {
                    struct RefreshSvc<T: CloudProvider>(pub Arc<T>);
                    impl<T: CloudProvider> tonic::server::UnaryService<super::RefreshRequest> for RefreshSvc<T> {
                        type Response = super::RefreshResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::RefreshRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.refresh(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = RefreshSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupTargetSize" => {
                    struct NodeGroupTargetSizeSvc<T: CloudProvider>(pub Arc<T>);
                    impl<T: CloudProvider> tonic::server::UnaryService<super::NodeGroupTargetSizeRequest> for NodeGroupTargetSizeSvc<T> {
                        type Response = super::NodeGroupTargetSizeResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::NodeGroupTargetSizeRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.node_group_target_size(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = NodeGroupTargetSizeSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupIncreaseSize" => {
                    struct NodeGroupIncreaseSizeSvc<T: CloudProvider>(pub Arc<T>);
                    impl<T: CloudProvider> tonic::server::UnaryService<super::NodeGroupIncreaseSizeRequest> for NodeGroupIncreaseSizeSvc<T> {
                        type Response = super::NodeGroupIncreaseSizeResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::NodeGroupIncreaseSizeRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.node_group_increase_size(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = NodeGroupIncreaseSizeSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupDeleteNodes" => {
                    struct NodeGroupDeleteNodesSvc<T: CloudProvider>(pub Arc<T>);
                    impl<T: CloudProvider> tonic::server::UnaryService<super::NodeGroupDeleteNodesRequest> for NodeGroupDeleteNodesSvc<T> {
                        type Response = super::NodeGroupDeleteNodesResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::NodeGroupDeleteNodesRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.node_group_delete_nodes(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = NodeGroupDeleteNodesSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupDecreaseTargetSize" => {
                    struct NodeGroupDecreaseTargetSizeSvc<T: CloudProvider>(pub Arc<T>);
                    impl<T: CloudProvider> tonic::server::UnaryService<super::NodeGroupDecreaseTargetSizeRequest> for NodeGroupDecreaseTargetSizeSvc<T> {
                        type Response = super::NodeGroupDecreaseTargetSizeResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::NodeGroupDecreaseTargetSizeRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.node_group_decrease_target_size(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = NodeGroupDecreaseTargetSizeSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupNodes" => {
                    struct NodeGroupNodesSvc<T: CloudProvider>(pub Arc<T>);
                    impl<T: CloudProvider> tonic::server::UnaryService<super::NodeGroupNodesRequest> for NodeGroupNodesSvc<T> {
                        type Response = super::NodeGroupNodesResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::NodeGroupNodesRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.node_group_nodes(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = NodeGroupNodesSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                _ => Box::pin(async move {
                    let mut response = http::Response::new(tonic::body::empty_body());
                    let headers = response.headers_mut();
                    headers.insert("grpc-status", http::HeaderValue::from_static("12"));
                    headers.insert(
                        http::header::CONTENT_TYPE,
                        http::HeaderValue::from_static("application/grpc"),
                    );
                    Ok(response)
                }),
            }
        }
    }

    impl<T: CloudProvider> tonic::server::NamedService for CloudProviderServer<T> {
        const NAME: &'static str = "clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider";
    }
}
