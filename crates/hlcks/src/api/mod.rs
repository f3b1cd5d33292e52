//! Monitoring-API client and resource types.
//!
//! The [`CheckApi`] trait is the seam the reconciler and the issuance
//! coordinator consume, so tests can substitute an in-memory backend.

pub mod client;
pub mod registry;
pub mod types;

use async_trait::async_trait;
use uuid::Uuid;

pub use client::HealthchecksClient;
pub use registry::ClientRegistry;
pub use types::{
    Channel, Check, CheckPayload, CheckRecord, CheckStatus, Flip, FlipQuery, Ping,
};

use crate::error::ApiError;

/// CRUD surface of the remote check/channel resources
#[async_trait]
pub trait CheckApi: Send + Sync {
    /// List all checks, optionally filtered by tags.
    async fn list_checks(&self, tags: &[String]) -> Result<Vec<Check>, ApiError>;

    /// Fetch one check by UUID.
    async fn get_check(&self, uuid: Uuid) -> Result<Check, ApiError>;

    /// Find a check by name, or `None` if absent.
    async fn find_check(&self, name: &str) -> Result<Option<Check>, ApiError>;

    /// Create-or-update a check, keyed by its name.
    async fn write_check(&self, payload: &CheckPayload) -> Result<Check, ApiError>;

    /// Update select fields of an existing check.
    async fn update_check(&self, uuid: Uuid, payload: &CheckPayload) -> Result<Check, ApiError>;

    /// Delete an existing check.
    async fn delete_check(&self, uuid: Uuid) -> Result<(), ApiError>;

    /// Pause monitoring of an existing check.
    async fn pause_check(&self, uuid: Uuid) -> Result<Check, ApiError>;

    /// Resume monitoring of a paused check.
    async fn resume_check(&self, uuid: Uuid) -> Result<Check, ApiError>;

    /// List existing notification integrations.
    async fn list_channels(&self) -> Result<Vec<Channel>, ApiError>;
}
