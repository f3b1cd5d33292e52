//! Named issuance policies.
//!
//! A policy names the parameter overrides an issuer applies to delegated
//! checks, plus an optional matcher pattern restricting which requesters
//! may invoke it. Policies come from two configuration sources; the
//! primary set always shadows the fallback set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::check::CheckParams;
use crate::error::HlcksError;

/// A single issuance policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuancePolicy {
    /// Pattern the requester identity must satisfy. Absent means the
    /// policy is open to every peer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,

    /// Check parameters the policy enforces over caller-supplied values.
    #[serde(default)]
    pub params: CheckParams,
}

/// Resolves policy names against the primary and fallback sources
#[derive(Debug, Clone, Default)]
pub struct PolicyStore {
    primary: BTreeMap<String, IssuancePolicy>,
    fallback: BTreeMap<String, IssuancePolicy>,
}

impl PolicyStore {
    pub fn new(
        primary: BTreeMap<String, IssuancePolicy>,
        fallback: BTreeMap<String, IssuancePolicy>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Look up a policy by name, primary source first.
    pub fn resolve(&self, name: &str) -> Result<&IssuancePolicy, HlcksError> {
        self.primary
            .get(name)
            .or_else(|| self.fallback.get(name))
            .ok_or_else(|| HlcksError::Policy {
                policy: name.to_string(),
                reason: "no such policy is configured".to_string(),
            })
    }
}
