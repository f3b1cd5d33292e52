//! File-backed cache implementation.
//!
//! Each bank is stored as one JSON object file under the cache root, so
//! entries survive process restarts. Writes within this process are
//! serialized behind a mutex; concurrent writers to the same key resolve by
//! last write wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use super::{CacheError, ReturnsCache};

/// Persistent cache backend rooted at a directory
#[derive(Debug)]
pub struct FileCache {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn bank_path(&self, bank: &str) -> PathBuf {
        let mut path = self.root.join(bank);
        path.set_extension("json");
        path
    }

    async fn read_bank(path: &Path) -> Result<BTreeMap<String, String>, CacheError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl ReturnsCache for FileCache {
    async fn store(&self, bank: &str, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.bank_path(bank);
        let _guard = self.write_lock.lock().await;

        let mut entries = Self::read_bank(&path).await?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, serde_json::to_vec_pretty(&entries)?).await?;
        Ok(())
    }

    async fn contains(&self, bank: &str, key: &str) -> Result<bool, CacheError> {
        let entries = Self::read_bank(&self.bank_path(bank)).await?;
        Ok(entries.contains_key(key))
    }

    async fn fetch(&self, bank: &str, key: &str) -> Result<Option<String>, CacheError> {
        let entries = Self::read_bank(&self.bank_path(bank)).await?;
        Ok(entries.get(key).cloned())
    }
}
