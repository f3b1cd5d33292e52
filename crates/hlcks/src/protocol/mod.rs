//! Wire protocol for peer-to-peer ping URL issuance.

pub mod codec;
pub mod types;

pub use codec::{IssueCodec, MAX_MESSAGE_BYTES};
pub use types::{IssueRequest, IssueResponse};

/// Protocol identifier negotiated on every issuance stream.
pub const ISSUE_PROTOCOL: &str = "/hlcks/issue/1.0";
