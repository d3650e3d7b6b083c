//! Pool-level scaling over `Server` records
//!
//! All machines form one node group. Scaling only ever writes the desired power
//! state; nothing here talks to a machine.

use crate::error::ProviderError;
use crate::pb::cloud_provider_server::CloudProvider;
use crate::pb::instance_status::InstanceState;
use crate::pb::*;
use crds::{PowerState, Server};
use prost::Message;
use server_store::ServerStore;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{debug, info, warn};

/// Id of the single node group.
pub const NODE_GROUP_ID: &str = "bare-metal-pool";

/// Node label the autoscaler uses to recognise GPU nodes.
pub const GPU_LABEL: &str = "nvidia.com/gpu";

const INT64_VALUE_TYPE_URL: &str = "type.googleapis.com/google.protobuf.Int64Value";

/// CloudProvider backed by a [`ServerStore`].
#[derive(Clone)]
pub struct BareMetalProvider {
    store: Arc<dyn ServerStore>,
}

impl std::fmt::Debug for BareMetalProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BareMetalProvider").finish_non_exhaustive()
    }
}

fn check_node_group(id: &str) -> Result<(), ProviderError> {
    if id == NODE_GROUP_ID {
        Ok(())
    } else {
        Err(ProviderError::UnknownNodeGroup(id.to_string()))
    }
}

fn saturating_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn instance_state(server: &Server) -> InstanceState {
    match server.spec.power_state {
        Some(PowerState::On) => InstanceState::InstanceRunning,
        Some(PowerState::Off) => InstanceState::InstanceDeleting,
        None => InstanceState::Unspecified,
    }
}

impl BareMetalProvider {
    pub fn new(store: Arc<dyn ServerStore>) -> Self {
        Self { store }
    }

    fn node_group(size: usize) -> NodeGroup {
        NodeGroup {
            id: NODE_GROUP_ID.to_string(),
            min_size: 0,
            max_size: saturating_i32(size),
            debug: String::new(),
        }
    }

    /// The single pool, sized by the number of records.
    pub async fn list_node_groups(&self) -> Result<Vec<NodeGroup>, ProviderError> {
        let servers = self.store.list().await?;
        Ok(vec![Self::node_group(servers.len())])
    }

    /// Pool owning `node`, or `None` when no record carries its name.
    pub async fn node_group_for(&self, node: Option<&ExternalGrpcNode>) -> Result<Option<NodeGroup>, ProviderError> {
        let node = node.ok_or_else(|| ProviderError::InvalidArgument("node is required".to_string()))?;

        if self.store.get(&node.name).await?.is_none() {
            debug!("Node {} is not a managed server", node.name);
            return Ok(None);
        }

        let servers = self.store.list().await?;
        Ok(Some(Self::node_group(servers.len())))
    }

    /// Number of records whose desired state is on.
    pub async fn target_size(&self, id: &str) -> Result<usize, ProviderError> {
        check_node_group(id)?;
        let servers = self.store.list().await?;
        Ok(servers
            .iter()
            .filter(|s| s.spec.power_state == Some(PowerState::On))
            .count())
    }

    /// Flip up to `delta` records from `from` to `to`, returning how many flipped.
    async fn flip(&self, delta: usize, from: PowerState, to: PowerState) -> Result<usize, ProviderError> {
        let servers = self.store.list().await?;
        let mut flipped = 0;

        for server in servers.iter().filter(|s| s.spec.desired_power_state() == from) {
            if flipped >= delta {
                break;
            }
            self.store
                .update_power_state(server.name(), server.metadata.resource_version.as_deref(), to)
                .await?;
            info!("Set desired power state of {} to {}", server.name(), to);
            flipped += 1;
        }

        Ok(flipped)
    }

    /// Power on `delta` powered-off servers. Servers already flipped stay on if
    /// there are not enough to satisfy the request.
    pub async fn increase_size(&self, id: &str, delta: i32) -> Result<(), ProviderError> {
        check_node_group(id)?;
        let Ok(requested) = usize::try_from(delta) else {
            return Ok(());
        };
        if requested == 0 {
            return Ok(());
        }

        let provisioned = self.flip(requested, PowerState::Off, PowerState::On).await?;
        if provisioned < requested {
            warn!("Increase by {} only provisioned {} servers", requested, provisioned);
            return Err(ProviderError::InsufficientCapacity { requested, provisioned });
        }
        Ok(())
    }

    /// Power off up to `delta` powered-on servers. A shortfall is not an error.
    pub async fn decrease_target_size(&self, id: &str, delta: i32) -> Result<(), ProviderError> {
        check_node_group(id)?;
        let Ok(requested) = usize::try_from(delta) else {
            return Ok(());
        };
        if requested == 0 {
            return Ok(());
        }

        let released = self.flip(requested, PowerState::On, PowerState::Off).await?;
        if released < requested {
            debug!("Decrease by {} released only {} servers", requested, released);
        }
        Ok(())
    }

    /// Power off each named node.
    pub async fn delete_nodes(&self, id: &str, nodes: &[ExternalGrpcNode]) -> Result<(), ProviderError> {
        check_node_group(id)?;

        for node in nodes {
            let server = self
                .store
                .get(&node.name)
                .await?
                .ok_or_else(|| ProviderError::UnknownNode(node.name.clone()))?;

            self.store
                .update_power_state(
                    server.name(),
                    server.metadata.resource_version.as_deref(),
                    PowerState::Off,
                )
                .await?;
            info!("Deleted node {} (desired power state off)", node.name);
        }
        Ok(())
    }

    /// One instance per record.
    pub async fn nodes(&self, id: &str) -> Result<Vec<Instance>, ProviderError> {
        check_node_group(id)?;
        let servers = self.store.list().await?;

        Ok(servers
            .iter()
            .map(|server| Instance {
                id: server.name().to_string(),
                status: Some(InstanceStatus {
                    instance_state: instance_state(server) as i32,
                    error_info: None,
                }),
            })
            .collect())
    }

    /// Record count per `gpu-type` label value.
    pub async fn gpu_type_counts(&self) -> Result<BTreeMap<String, i64>, ProviderError> {
        let servers = self.store.list().await?;
        let mut counts = BTreeMap::new();
        for gpu_type in servers.iter().filter_map(Server::gpu_type) {
            *counts.entry(gpu_type.to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

/// Packs `value` as a `google.protobuf.Any` holding an `Int64Value`.
pub fn int64_any(value: i64) -> prost_types::Any {
    prost_types::Any {
        type_url: INT64_VALUE_TYPE_URL.to_string(),
        value: value.encode_to_vec(),
    }
}

#[tonic::async_trait]
impl CloudProvider for BareMetalProvider {
    async fn node_groups(
        &self,
        _request: Request<NodeGroupsRequest>,
    ) -> Result<Response<NodeGroupsResponse>, Status> {
        let node_groups = self.list_node_groups().await?;
        Ok(Response::new(NodeGroupsResponse { node_groups }))
    }

    async fn node_group_for_node(
        &self,
        request: Request<NodeGroupForNodeRequest>,
    ) -> Result<Response<NodeGroupForNodeResponse>, Status> {
        let req = request.into_inner();
        let node_group = self.node_group_for(req.node.as_ref()).await?;
        Ok(Response::new(NodeGroupForNodeResponse { node_group }))
    }

    async fn gpu_label(
        &self,
        _request: Request<GpuLabelRequest>,
    ) -> Result<Response<GpuLabelResponse>, Status> {
        Ok(Response::new(GpuLabelResponse {
            label: GPU_LABEL.to_string(),
        }))
    }

    async fn get_available_gpu_types(
        &self,
        _request: Request<GetAvailableGpuTypesRequest>,
    ) -> Result<Response<GetAvailableGpuTypesResponse>, Status> {
        let gpu_types: HashMap<_, _> = self
            .gpu_type_counts()
            .await?
            .into_iter()
            .map(|(gpu_type, count)| (gpu_type, int64_any(count)))
            .collect();
        Ok(Response::new(GetAvailableGpuTypesResponse { gpu_types }))
    }

    async fn cleanup(
        &self,
        _request: Request<CleanupRequest>,
    ) -> Result<Response<CleanupResponse>, Status> {
        Ok(Response::new(CleanupResponse {}))
    }

    async fn refresh(
        &self,
        _request: Request<RefreshRequest>,
    ) -> Result<Response<RefreshResponse>, Status> {
        Ok(Response::new(RefreshResponse {}))
    }

    async fn node_group_target_size(
        &self,
        request: Request<NodeGroupTargetSizeRequest>,
    ) -> Result<Response<NodeGroupTargetSizeResponse>, Status> {
        let req = request.into_inner();
        let target_size = self.target_size(&req.id).await?;
        Ok(Response::new(NodeGroupTargetSizeResponse {
            target_size: saturating_i32(target_size),
        }))
    }

    async fn node_group_increase_size(
        &self,
        request: Request<NodeGroupIncreaseSizeRequest>,
    ) -> Result<Response<NodeGroupIncreaseSizeResponse>, Status> {
        let req = request.into_inner();
        self.increase_size(&req.id, req.delta).await?;
        Ok(Response::new(NodeGroupIncreaseSizeResponse {}))
    }

    async fn node_group_delete_nodes(
        &self,
        request: Request<NodeGroupDeleteNodesRequest>,
    ) -> Result<Response<NodeGroupDeleteNodesResponse>, Status> {
        let req = request.into_inner();
        self.delete_nodes(&req.id, &req.nodes).await?;
        Ok(Response::new(NodeGroupDeleteNodesResponse {}))
    }

    async fn node_group_decrease_target_size(
        &self,
        request: Request<NodeGroupDecreaseTargetSizeRequest>,
    ) -> Result<Response<NodeGroupDecreaseTargetSizeResponse>, Status> {
        let req = request.into_inner();
        self.decrease_target_size(&req.id, req.delta).await?;
        Ok(Response::new(NodeGroupDecreaseTargetSizeResponse {}))
    }

    async fn node_group_nodes(
        &self,
        request: Request<NodeGroupNodesRequest>,
    ) -> Result<Response<NodeGroupNodesResponse>, Status> {
        let req = request.into_inner();
        let instances = self.nodes(&req.id).await?;
        Ok(Response::new(NodeGroupNodesResponse { instances }))
    }
}
