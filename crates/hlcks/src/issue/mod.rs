//! Ping URL issuance.

pub mod coordinator;

pub use coordinator::IssueCoordinator;
