//! Hlcks - Healthchecks check management and distributed ping-URL issuance
//!
//! This library manages heartbeat checks against a Healthchecks-compatible
//! monitoring API and lets one node (the requester) ask another node (the
//! issuer) to create a check on its behalf and hand back the resulting ping
//! URL, without the requester ever holding monitoring-API credentials.

pub mod api;
pub mod cache;
pub mod check;
pub mod config;
pub mod error;
pub mod issue;
pub mod network;
pub mod node;
pub mod policy;
pub mod protocol;
pub mod transport;

// Re-export main types
pub use api::{Channel, Check, CheckApi, CheckStatus, ClientRegistry, HealthchecksClient};
pub use cache::{FileCache, MemoryCache, ReturnsCache, RETURNS_BANK};
pub use check::{
    ensure_absent, ensure_pause_state, ensure_present, reconcile, Changes, CheckParams,
    Reconciliation, StateOutcome,
};
pub use config::Config;
pub use error::{ApiError, HlcksError};
pub use issue::IssueCoordinator;
pub use node::{IssuerNode, NodeConfig, NodeHandle, PeerBook};
pub use policy::{GlobMatcher, IssuancePolicy, PolicyStore, RequesterMatcher};
pub use protocol::{IssueCodec, IssueRequest, IssueResponse, ISSUE_PROTOCOL};
pub use transport::{RemoteTransport, TransportError};

/// Re-export common error types
pub use anyhow;

/// The version of the issuance protocol
pub const PROTOCOL_VERSION: &str = "1.0";
