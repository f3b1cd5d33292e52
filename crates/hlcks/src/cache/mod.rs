//! Last-known-good ping URL cache.
//!
//! The cache records the last successfully issued URL per check name and is
//! consulted only as a fallback when issuance fails. There is no TTL and no
//! eviction; every later success overwrites the entry (last write wins).

pub mod file;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileCache;
pub use memory::MemoryCache;

/// Bank under which issued ping URLs are stored.
pub const RETURNS_BANK: &str = "hlcks/check_returns";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Trait for namespaced key/value cache backends
#[async_trait]
pub trait ReturnsCache: Send + Sync {
    /// Store a value, overwriting any previous entry under the same key.
    async fn store(&self, bank: &str, key: &str, value: &str) -> Result<(), CacheError>;

    /// Whether an entry exists under the key.
    async fn contains(&self, bank: &str, key: &str) -> Result<bool, CacheError>;

    /// Fetch the entry under the key, if any.
    async fn fetch(&self, bank: &str, key: &str) -> Result<Option<String>, CacheError>;
}
