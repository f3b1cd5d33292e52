//! Node configuration loading.
//!
//! Configuration lives in a TOML file, by default at
//! `$XDG_CONFIG_HOME/hlcks/config.toml` (falling back to
//! `$HOME/.config/hlcks/config.toml`). Unrecognized fields are rejected at
//! the deserialization boundary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::{IssuancePolicy, PolicyStore};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("no config file at {0}")]
    Missing(PathBuf),

    #[error("cannot determine a config path (no XDG_CONFIG_HOME or HOME)")]
    PathUnavailable,
}

/// Connection profile for the monitoring API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiProfile {
    #[serde(default = "default_api_url")]
    pub url: String,

    /// API key. Must not be read-only.
    pub token: String,

    /// TLS verification toggle; `Some(false)` disables verification.
    #[serde(default)]
    pub verify: Option<bool>,
}

fn default_api_url() -> String {
    "http://localhost:3475".to_string()
}

/// Settings for the issuer node's transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSettings {
    /// TCP port to listen on; 0 picks an ephemeral port.
    #[serde(default)]
    pub port: u16,

    /// How long a delegated call may take before it counts as unanswered.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Path to the node keypair (generated on first use when absent).
    #[serde(default)]
    pub keypair_path: Option<PathBuf>,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            port: 0,
            request_timeout_secs: default_request_timeout_secs(),
            keypair_path: None,
        }
    }
}

/// A named peer this node may delegate to, or accept delegations from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeerConfig {
    /// Base58 peer id of the remote node.
    pub peer_id: String,

    /// Multiaddr the peer listens on.
    pub address: String,
}

/// Top-level configuration for an hlcks node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The identity this node is known by to its peers.
    pub identity: String,

    pub api: ApiProfile,

    #[serde(default)]
    pub node: NodeSettings,

    #[serde(default)]
    pub peers: BTreeMap<String, PeerConfig>,

    /// High-priority issuance policies, resolved first.
    #[serde(default)]
    pub policies: BTreeMap<String, IssuancePolicy>,

    /// Lower-priority issuance policies, consulted only on a miss above.
    #[serde(default)]
    pub fallback_policies: BTreeMap<String, IssuancePolicy>,

    /// Root directory of the file-backed URL cache.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

/// Get the default config path ($XDG_CONFIG_HOME/hlcks/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<PathBuf, ConfigError> {
    let base = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(config_home)
    } else if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".config")
    } else {
        return Err(ConfigError::PathUnavailable);
    };

    Ok(base.join("hlcks/config.toml"))
}

impl Config {
    /// Load configuration from the given path, or the default location.
    pub fn load(optional_path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        let path = match optional_path {
            Some(path) => path.as_ref().to_path_buf(),
            None => default_config_path()?,
        };

        if !path.exists() {
            return Err(ConfigError::Missing(path));
        }

        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFailed {
            path: path.clone(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::ParseFailed { path, source })
    }

    /// Parse configuration from a TOML string.
    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Build the policy store from the two configured policy sources.
    pub fn policy_store(&self) -> PolicyStore {
        PolicyStore::new(self.policies.clone(), self.fallback_policies.clone())
    }
}
