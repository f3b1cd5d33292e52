//! Runtime configuration of an issuer node.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use libp2p::{Multiaddr, PeerId};

use crate::config::Config;

/// A known peer: its libp2p identity and where to dial it
#[derive(Debug, Clone)]
pub struct PeerEntry {
    pub peer_id: PeerId,
    pub address: Multiaddr,
}

/// Named peers this node may delegate to, with reverse lookup from the
/// libp2p identity back to the configured name
#[derive(Debug, Clone, Default)]
pub struct PeerBook {
    by_name: BTreeMap<String, PeerEntry>,
}

impl PeerBook {
    pub fn add(&mut self, name: impl Into<String>, peer_id: PeerId, address: Multiaddr) {
        self.by_name.insert(name.into(), PeerEntry { peer_id, address });
    }

    pub fn get(&self, name: &str) -> Option<&PeerEntry> {
        self.by_name.get(name)
    }

    /// Reverse lookup: the configured name of a peer identity. This is how
    /// an issuer decides who a request came from; the request itself never
    /// names its sender.
    pub fn name_of(&self, peer_id: &PeerId) -> Option<&str> {
        self.by_name
            .iter()
            .find(|(_, entry)| entry.peer_id == *peer_id)
            .map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Runtime settings of the issuer node
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// The identity this node is known by to its peers.
    pub identity: String,

    /// TCP port to listen on; 0 picks an ephemeral port.
    pub port: u16,

    /// How long a delegated call may take before it counts as unanswered.
    pub request_timeout: Duration,

    /// Where the node keypair persists; ephemeral identity when absent.
    pub keypair_path: Option<PathBuf>,

    pub peers: PeerBook,
}

impl NodeConfig {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            port: 0,
            request_timeout: Duration::from_secs(30),
            keypair_path: None,
            peers: PeerBook::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_keypair_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.keypair_path = Some(path.into());
        self
    }

    pub fn with_peer(mut self, name: impl Into<String>, peer_id: PeerId, address: Multiaddr) -> Self {
        self.peers.add(name, peer_id, address);
        self
    }

    /// Build node settings from a loaded configuration file, parsing the
    /// textual peer ids and addresses.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut node = NodeConfig::new(&config.identity)
            .with_port(config.node.port)
            .with_request_timeout(Duration::from_secs(config.node.request_timeout_secs));
        node.keypair_path = config.node.keypair_path.clone();

        for (name, peer) in &config.peers {
            let peer_id: PeerId = peer
                .peer_id
                .parse()
                .with_context(|| format!("invalid peer id for peer {name}"))?;
            let address: Multiaddr = peer
                .address
                .parse()
                .with_context(|| format!("invalid address for peer {name}"))?;
            node.peers.add(name, peer_id, address);
        }

        Ok(node)
    }
}
