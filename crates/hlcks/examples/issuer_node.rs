//! Run an issuer node that serves ping URL requests from its peers.
//!
//! Usage: issuer_node [config.toml]

use std::sync::Arc;

use anyhow::Result;

use hlcks::api::{CheckApi, ClientRegistry};
use hlcks::cache::{FileCache, MemoryCache, ReturnsCache};
use hlcks::config::Config;
use hlcks::issue::IssueCoordinator;
use hlcks::node::{IssuerNode, NodeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args().nth(1);
    let config = Config::load(config_path.as_deref())?;

    let registry = ClientRegistry::new();
    let api = registry.client_for(&config.api).await?;

    let cache: Arc<dyn ReturnsCache> = match &config.cache_dir {
        Some(dir) => Arc::new(FileCache::new(dir)),
        None => Arc::new(MemoryCache::new()),
    };

    let coordinator = Arc::new(IssueCoordinator::new(
        &config.identity,
        api as Arc<dyn CheckApi>,
        config.policy_store(),
        cache,
    ));

    let node_config = NodeConfig::from_config(&config)?;
    let node = IssuerNode::new(node_config, coordinator)?;
    println!("issuer {} running as {}", config.identity, node.peer_id());

    node.run().await
}
