//! Local Key-Value Persistence
//!
//! String-to-string storage for proof blobs (`proof_<id>`) and the cached
//! self-test results. Writes to the same key are last-writer-wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Returns whether the key existed
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;

    async fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-process store, lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

/// Store mirrored to a JSON file after every write
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open `path`, loading existing entries. A missing file starts empty and
    /// its parent directory is created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let entries: BTreeMap<String, String> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), entries = entries.len(), "Opened file store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        // Memory only changes once the file write succeeded
        let mut staged = entries.clone();
        staged.insert(key.to_string(), value);
        self.persist(&staged).await?;
        *entries = staged;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) {
            return Ok(false);
        }

        let mut staged = entries.clone();
        staged.remove(key);
        self.persist(&staged).await?;
        *entries = staged;
        Ok(true)
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}
