//! Issuer node: swarm ownership, event loop, and the handle other tasks
//! use to reach remote issuers.

pub mod config;
pub mod core;
pub mod handle;
pub mod keys;

pub use config::{NodeConfig, PeerBook, PeerEntry};
pub use core::IssuerNode;
pub use handle::NodeHandle;
