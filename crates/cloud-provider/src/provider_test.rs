//! Unit tests for the BareMetalProvider

use crate::error::ProviderError;
use crate::pb::cloud_provider_client::CloudProviderClient;
use crate::pb::cloud_provider_server::CloudProvider;
use crate::pb::instance_status::InstanceState;
use crate::pb::*;
use crate::provider::{BareMetalProvider, NODE_GROUP_ID, int64_any};
use crate::server::{GrpcServerOptions, serve};
use crds::{PowerState, Server, ServerSpec};
use prost::Message;
use server_store::{MockServerStore, ServerStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tonic::{Code, Request};

fn server(name: &str, power_state: Option<PowerState>) -> Server {
    Server::new(
        name,
        ServerSpec {
            power_state,
            ..Default::default()
        },
    )
}

fn gpu_server(name: &str, gpu_type: &str) -> Server {
    let mut s = server(name, Some(PowerState::Off));
    s.metadata.labels = Some(BTreeMap::from([("gpu-type".to_string(), gpu_type.to_string())]));
    s
}

fn node(name: &str) -> ExternalGrpcNode {
    ExternalGrpcNode {
        name: name.to_string(),
        ..Default::default()
    }
}

fn provider_with(servers: Vec<Server>) -> (BareMetalProvider, MockServerStore) {
    let store = MockServerStore::new();
    for s in servers {
        store.insert(s);
    }
    (BareMetalProvider::new(Arc::new(store.clone())), store)
}

fn desired(store: &MockServerStore, name: &str) -> Option<PowerState> {
    store.server(name).and_then(|s| s.spec.power_state)
}

#[tokio::test]
async fn test_node_groups_single_pool_sized_by_records() {
    let (provider, _) = provider_with(vec![
        server("node-1", Some(PowerState::On)),
        server("node-2", Some(PowerState::Off)),
        server("node-3", None),
    ]);

    let groups = provider
        .node_groups(Request::new(NodeGroupsRequest {}))
        .await
        .unwrap()
        .into_inner()
        .node_groups;

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, "bare-metal-pool");
    assert_eq!(groups[0].min_size, 0);
    assert_eq!(groups[0].max_size, 3);
}

#[tokio::test]
async fn test_node_group_nodes_maps_power_state() {
    let (provider, _) = provider_with(vec![
        server("node-1", Some(PowerState::On)),
        server("node-2", Some(PowerState::Off)),
        server("node-3", None),
    ]);

    let instances = provider.nodes(NODE_GROUP_ID).await.unwrap();
    let states: Vec<_> = instances
        .iter()
        .map(|i| (i.id.as_str(), i.status.as_ref().unwrap().instance_state))
        .collect();

    assert_eq!(
        states,
        vec![
            ("node-1", InstanceState::InstanceRunning as i32),
            ("node-2", InstanceState::InstanceDeleting as i32),
            ("node-3", InstanceState::Unspecified as i32),
        ]
    );
}

#[tokio::test]
async fn test_unknown_node_group_is_rejected() {
    let (provider, store) = provider_with(vec![server("node-1", Some(PowerState::Off))]);

    assert!(matches!(provider.nodes("other").await, Err(ProviderError::UnknownNodeGroup(_))));
    assert!(matches!(provider.target_size("other").await, Err(ProviderError::UnknownNodeGroup(_))));
    assert!(matches!(
        provider.increase_size("other", 1).await,
        Err(ProviderError::UnknownNodeGroup(_))
    ));

    let status = provider
        .node_group_target_size(Request::new(NodeGroupTargetSizeRequest { id: "other".into() }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_node_group_for_node() {
    let (provider, _) = provider_with(vec![server("node-1", None), server("node-2", None)]);

    let group = provider.node_group_for(Some(&node("node-1"))).await.unwrap().unwrap();
    assert_eq!(group.id, NODE_GROUP_ID);
    assert_eq!(group.max_size, 2);

    assert!(provider.node_group_for(Some(&node("stranger"))).await.unwrap().is_none());

    let status = provider
        .node_group_for_node(Request::new(NodeGroupForNodeRequest { node: None }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn test_target_size_counts_desired_on() {
    let (provider, _) = provider_with(vec![
        server("node-1", Some(PowerState::On)),
        server("node-2", Some(PowerState::On)),
        server("node-3", Some(PowerState::Off)),
    ]);
    assert_eq!(provider.target_size(NODE_GROUP_ID).await.unwrap(), 2);
}

#[tokio::test]
async fn test_increase_size_flips_off_servers() {
    let (provider, store) = provider_with(vec![
        server("node-1", Some(PowerState::Off)),
        server("node-2", Some(PowerState::On)),
        server("node-3", Some(PowerState::Off)),
    ]);

    provider.increase_size(NODE_GROUP_ID, 1).await.unwrap();

    assert_eq!(desired(&store, "node-1"), Some(PowerState::On));
    assert_eq!(desired(&store, "node-3"), Some(PowerState::Off));
    assert_eq!(provider.target_size(NODE_GROUP_ID).await.unwrap(), 2);
}

#[tokio::test]
async fn test_increase_size_shortfall_keeps_partial_flips() {
    let (provider, store) = provider_with(vec![
        server("node-1", Some(PowerState::Off)),
        server("node-2", Some(PowerState::On)),
        server("node-3", Some(PowerState::Off)),
    ]);

    let err = provider.increase_size(NODE_GROUP_ID, 5).await.unwrap_err();
    assert!(matches!(
        err,
        ProviderError::InsufficientCapacity {
            requested: 5,
            provisioned: 2
        }
    ));

    assert_eq!(store.write_count(), 2);
    assert_eq!(provider.target_size(NODE_GROUP_ID).await.unwrap(), 3);

    let status = provider
        .node_group_increase_size(Request::new(NodeGroupIncreaseSizeRequest {
            delta: 1,
            id: NODE_GROUP_ID.into(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::ResourceExhausted);
}

#[tokio::test]
async fn test_non_positive_delta_is_noop() {
    let (provider, store) = provider_with(vec![
        server("node-1", Some(PowerState::Off)),
        server("node-2", Some(PowerState::On)),
    ]);

    provider.increase_size(NODE_GROUP_ID, 0).await.unwrap();
    provider.increase_size(NODE_GROUP_ID, -2).await.unwrap();
    provider.decrease_target_size(NODE_GROUP_ID, 0).await.unwrap();
    provider.decrease_target_size(NODE_GROUP_ID, -1).await.unwrap();

    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_decrease_target_size_shortfall_succeeds() {
    let (provider, store) = provider_with(vec![
        server("node-1", Some(PowerState::On)),
        server("node-2", Some(PowerState::Off)),
        server("node-3", Some(PowerState::On)),
    ]);

    provider.decrease_target_size(NODE_GROUP_ID, 5).await.unwrap();

    assert_eq!(store.write_count(), 2);
    assert_eq!(provider.target_size(NODE_GROUP_ID).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_nodes_powers_off_named_servers() {
    let (provider, store) = provider_with(vec![
        server("node-1", Some(PowerState::On)),
        server("node-2", Some(PowerState::On)),
    ]);

    provider.delete_nodes(NODE_GROUP_ID, &[node("node-2")]).await.unwrap();

    assert_eq!(desired(&store, "node-1"), Some(PowerState::On));
    assert_eq!(desired(&store, "node-2"), Some(PowerState::Off));
}

#[tokio::test]
async fn test_delete_unknown_node_fails() {
    let (provider, _) = provider_with(vec![server("node-1", Some(PowerState::On))]);

    let status = provider
        .node_group_delete_nodes(Request::new(NodeGroupDeleteNodesRequest {
            nodes: vec![node("ghost")],
            id: NODE_GROUP_ID.into(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_conflict_surfaces_as_aborted() {
    let (provider, store) = provider_with(vec![server("node-1", Some(PowerState::Off))]);
    store.conflict_next_write("node-1");

    let status = provider
        .node_group_increase_size(Request::new(NodeGroupIncreaseSizeRequest {
            delta: 1,
            id: NODE_GROUP_ID.into(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Aborted);
    assert_eq!(desired(&store, "node-1"), Some(PowerState::Off));
}

#[tokio::test]
async fn test_gpu_types_counted_per_label() {
    let (provider, _) = provider_with(vec![
        gpu_server("node-1", "a100"),
        gpu_server("node-2", "a100"),
        gpu_server("node-3", "h100"),
        server("node-4", None),
    ]);

    let gpu_types = provider
        .get_available_gpu_types(Request::new(GetAvailableGpuTypesRequest {}))
        .await
        .unwrap()
        .into_inner()
        .gpu_types;

    assert_eq!(gpu_types.len(), 2);
    let a100 = &gpu_types["a100"];
    assert_eq!(a100.type_url, "type.googleapis.com/google.protobuf.Int64Value");
    assert_eq!(i64::decode(a100.value.as_slice()).unwrap(), 2);
    assert_eq!(i64::decode(gpu_types["h100"].value.as_slice()).unwrap(), 1);
}

#[tokio::test]
async fn test_gpu_types_empty_and_label() {
    let (provider, _) = provider_with(vec![server("node-1", None)]);

    let gpu_types = provider
        .get_available_gpu_types(Request::new(GetAvailableGpuTypesRequest {}))
        .await
        .unwrap()
        .into_inner()
        .gpu_types;
    assert!(gpu_types.is_empty());

    let label = provider
        .gpu_label(Request::new(GpuLabelRequest {}))
        .await
        .unwrap()
        .into_inner()
        .label;
    assert_eq!(label, "nvidia.com/gpu");
}

#[test]
fn test_int64_any_encoding() {
    let any = int64_any(7);
    assert_eq!(any.value, vec![0x08, 0x07]);
}

#[tokio::test]
async fn test_served_over_grpc() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let address = format!("127.0.0.1:{port}");

    let store = MockServerStore::new();
    store.insert(server("node-1", Some(PowerState::Off)));
    let shared: Arc<dyn ServerStore> = Arc::new(store.clone());

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let options = GrpcServerOptions {
        address: address.clone(),
        ..Default::default()
    };
    let handle = tokio::spawn(serve(options, shared, async {
        let _ = stop_rx.await;
    }));

    let mut client = None;
    for _ in 0..50 {
        if let Ok(c) = CloudProviderClient::connect(format!("http://{address}")).await {
            client = Some(c);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let mut client = client.expect("server did not start");

    client
        .node_group_increase_size(NodeGroupIncreaseSizeRequest {
            delta: 1,
            id: NODE_GROUP_ID.into(),
        })
        .await
        .unwrap();
    assert_eq!(desired(&store, "node-1"), Some(PowerState::On));

    let target = client
        .node_group_target_size(NodeGroupTargetSizeRequest { id: NODE_GROUP_ID.into() })
        .await
        .unwrap()
        .into_inner()
        .target_size;
    assert_eq!(target, 1);

    let channel = tonic::transport::Endpoint::from_shared(format!("http://{address}"))
        .unwrap()
        .connect()
        .await
        .unwrap();
    let mut grpc = tonic::client::Grpc::new(channel);
    grpc.ready().await.unwrap();
    let path = tonic::codegen::http::uri::PathAndQuery::from_static(
        "/clusterautoscaler.cloudprovider.v1.externalgrpc.CloudProvider/NodeGroupTemplateNodeInfo",
    );
    let status = grpc
        .unary::<CleanupRequest, CleanupResponse, _>(
            Request::new(CleanupRequest {}),
            path,
            tonic::codec::ProstCodec::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unimplemented);

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
