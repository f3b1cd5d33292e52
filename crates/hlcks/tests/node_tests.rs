//! Issuer node lifecycle and handle behavior.

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use common::FakeApi;
use hlcks::cache::MemoryCache;
use hlcks::check::CheckParams;
use hlcks::issue::IssueCoordinator;
use hlcks::node::{IssuerNode, NodeConfig};
use hlcks::policy::PolicyStore;
use hlcks::protocol::IssueRequest;
use hlcks::transport::{RemoteTransport, TransportError};

fn coordinator(identity: &str) -> Arc<IssueCoordinator> {
    Arc::new(IssueCoordinator::new(
        identity,
        Arc::new(FakeApi::new()) as Arc<dyn hlcks::api::CheckApi>,
        PolicyStore::new(BTreeMap::new(), BTreeMap::new()),
        Arc::new(MemoryCache::new()),
    ))
}

#[tokio::test]
async fn node_creation_succeeds() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = NodeConfig::new("www1");
    let node = IssuerNode::new(config, coordinator("www1"));
    assert!(node.is_ok(), "failed to create node: {:?}", node.err());
}

#[tokio::test]
async fn node_keeps_running_while_idle() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = NodeConfig::new("www1");
    let node = IssuerNode::new(config, coordinator("www1")).unwrap();

    let running = tokio::spawn(node.run());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!running.is_finished());
    running.abort();
}

#[tokio::test]
async fn calling_an_unknown_peer_fails_fast() {
    let config = NodeConfig::new("www1").with_request_timeout(Duration::from_secs(5));
    let node = IssuerNode::new(config, coordinator("www1")).unwrap();
    let handle = node.handle();
    tokio::spawn(node.run());

    let request = IssueRequest {
        name: "backup".to_string(),
        policy: "borgmatic".to_string(),
        params: CheckParams::default(),
    };
    let error = handle.call("nobody", request).await.unwrap_err();
    assert!(matches!(error, TransportError::UnknownPeer(_)));
}

#[tokio::test]
async fn persisted_identity_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("node.key");

    let first = IssuerNode::new(
        NodeConfig::new("www1").with_keypair_path(&path),
        coordinator("www1"),
    )
    .unwrap();
    let second = IssuerNode::new(
        NodeConfig::new("www1").with_keypair_path(&path),
        coordinator("www1"),
    )
    .unwrap();

    assert_eq!(first.peer_id(), second.peer_id());
}
