//! Error taxonomy for check management and issuance.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors reported by the monitoring API, keyed to its HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 400
    #[error("invalid request: {0}")]
    Invocation(String),

    /// HTTP 403
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// HTTP 404
    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP 405
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// HTTP 412
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// HTTP 500 / 502
    #[error("server error: {0}")]
    Server(String),

    /// HTTP 503
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Any other non-2xx status
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be interpreted
    #[error("malformed API payload: {0}")]
    Decode(String),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Map a non-success HTTP status to the matching error variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 => ApiError::Invocation(message),
            403 => ApiError::PermissionDenied(message),
            404 => ApiError::NotFound(message),
            405 => ApiError::UnsupportedOperation(message),
            412 => ApiError::PreconditionFailed(message),
            500 | 502 => ApiError::Server(message),
            503 => ApiError::Unavailable(message),
            _ => ApiError::Status { status, message },
        }
    }
}

/// Errors surfaced by the issuance coordinator and the declarative wrappers.
#[derive(Debug, Error)]
pub enum HlcksError {
    /// Malformed caller arguments. Rejected immediately, never retried,
    /// never served from cache.
    #[error("invalid invocation: {0}")]
    Invocation(String),

    /// A policy's requester matcher rejected the caller.
    #[error("requester {requester} is not authorized for policy {policy}")]
    PermissionDenied { requester: String, policy: String },

    /// The named policy could not be resolved (unknown name, malformed
    /// definition, or matcher backend failure). Distinct from a denial.
    #[error("failed to resolve policy {policy}: {reason}")]
    Policy { policy: String, reason: String },

    /// A check that was expected to exist is missing.
    #[error("check {0} does not exist")]
    MissingCheck(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The issuer answered, but with an application-level error list.
    #[error("issuer {issuer} rejected the request: {}", errors.join("; "))]
    Rejected { issuer: String, errors: Vec<String> },

    #[error("cache error: {0}")]
    Cache(#[from] crate::cache::CacheError),
}

impl HlcksError {
    /// Whether a failed issuance may be answered from the URL cache.
    ///
    /// Monitoring-API failures, transport failures and peer rejections are
    /// recoverable; caller errors and local authorization denials are
    /// terminal.
    pub fn recoverable_via_cache(&self) -> bool {
        matches!(
            self,
            HlcksError::Api(_) | HlcksError::Transport(_) | HlcksError::Rejected { .. }
        )
    }
}
