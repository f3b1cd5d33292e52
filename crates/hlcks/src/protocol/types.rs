//! Issuance protocol messages.
//!
//! The request deliberately has no field for the requester's identity or
//! for API credentials. The issuer derives the requester from the peer the
//! message arrived on, and talks to the monitoring API with its own
//! credentials only.

use serde::{Deserialize, Serialize};

use crate::check::CheckParams;

/// A request to create-or-update a check and return its ping URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueRequest {
    /// Check name, before the issuer applies its requester prefix.
    pub name: String,

    /// Name of the policy the issuer must apply.
    pub policy: String,

    /// Caller-supplied check parameters; policy overrides win.
    #[serde(default)]
    pub params: CheckParams,
}

/// The issuer's answer: either a ping URL or a list of errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueResponse {
    /// The ping URL on success.
    #[serde(default)]
    pub data: Option<String>,

    /// Application-level errors; non-empty means the request failed.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl IssueResponse {
    pub fn success(ping_url: String) -> Self {
        IssueResponse {
            data: Some(ping_url),
            errors: Vec::new(),
        }
    }

    pub fn failure(error: String) -> Self {
        IssueResponse {
            data: None,
            errors: vec![error],
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some() && self.errors.is_empty()
    }
}
