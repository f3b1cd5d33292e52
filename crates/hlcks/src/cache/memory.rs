//! In-memory cache implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheError, ReturnsCache};

/// In-memory cache backend (per process, for testing and embedded use)
#[derive(Debug, Default, Clone)]
pub struct MemoryCache {
    banks: Arc<RwLock<HashMap<String, HashMap<String, String>>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReturnsCache for MemoryCache {
    async fn store(&self, bank: &str, key: &str, value: &str) -> Result<(), CacheError> {
        let mut banks = self.banks.write().await;
        banks
            .entry(bank.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn contains(&self, bank: &str, key: &str) -> Result<bool, CacheError> {
        let banks = self.banks.read().await;
        Ok(banks.get(bank).is_some_and(|b| b.contains_key(key)))
    }

    async fn fetch(&self, bank: &str, key: &str) -> Result<Option<String>, CacheError> {
        let banks = self.banks.read().await;
        Ok(banks.get(bank).and_then(|b| b.get(key).cloned()))
    }
}
