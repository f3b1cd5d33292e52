//! libp2p network behaviour for the issuance protocol.

pub mod behaviour;
pub mod events;

pub use behaviour::IssuerBehaviour;
pub use events::IssuerEvent;
