//! Issuance policies and requester authorization.

pub mod matcher;
pub mod store;

pub use matcher::{GlobMatcher, MatcherError, RequesterMatcher};
pub use store::{IssuancePolicy, PolicyStore};
