//! Ask a configured issuer peer for a ping URL.
//!
//! Usage: delegated_issue <config.toml> <check-name> <issuer> <policy>

use std::sync::Arc;

use anyhow::{bail, Result};

use hlcks::api::{CheckApi, ClientRegistry};
use hlcks::cache::{FileCache, MemoryCache, ReturnsCache};
use hlcks::check::CheckParams;
use hlcks::config::Config;
use hlcks::issue::IssueCoordinator;
use hlcks::node::{IssuerNode, NodeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    let [_, config_path, name, issuer, policy] = args.as_slice() else {
        bail!("usage: delegated_issue <config.toml> <check-name> <issuer> <policy>");
    };

    let config = Config::load(Some(config_path))?;

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
    let node = IssuerNode::new(node_config, Arc::clone(&coordinator))?;
    coordinator.set_transport(Arc::new(node.handle())).await;
    tokio::spawn(node.run());

    let url = coordinator
        .issue_ping_url(name, &CheckParams::default(), Some(issuer), Some(policy))
        .await?;
    println!("{url}");
    Ok(())
}
