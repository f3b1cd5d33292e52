//! Remote transport seam for delegated issuance.
//!
//! The coordinator only needs a request/response primitive: deliver one
//! envelope to one named peer and get exactly one envelope back.

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::{IssueRequest, IssueResponse};

/// Failures below the envelope level.
///
/// These are deliberately distinct from application-level errors carried in
/// [`IssueResponse::errors`], so audit logs can tell "the issuer rejected
/// this" apart from "the issuer was unreachable".
#[derive(Debug, Error)]
pub enum TransportError {
    /// No peer produced a response at all.
    #[error("no response from peer {0}")]
    NoResponse(String),

    /// The target is not present in the local peer book.
    #[error("unknown peer {0}")]
    UnknownPeer(String),

    /// The peer responded, but the envelope shape was unusable.
    #[error("malformed envelope from peer {peer}: {reason}")]
    MalformedEnvelope { peer: String, reason: String },

    /// The node driving the transport has shut down.
    #[error("transport channel closed")]
    ChannelClosed,
}

/// A single-request/single-response call to one named peer.
///
/// Implementations that fan a call out to several peers must reduce the
/// result to the first response received. That nondeterminism is documented
/// behavior, not an error: callers are expected to address a single issuer.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    async fn call(
        &self,
        target: &str,
        request: IssueRequest,
    ) -> Result<IssueResponse, TransportError>;
}
