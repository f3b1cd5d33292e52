//! Check reconciliation: desired parameters, diffing, and declarative
//! state wrappers.

pub mod ensure;
pub mod params;
pub mod reconcile;

pub use ensure::{ensure_absent, ensure_pause_state, ensure_present, StateOutcome};
pub use params::{ChannelSelector, CheckParams};
pub use reconcile::{reconcile, Changes, FieldDiff, Reconciliation};
