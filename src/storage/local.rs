//! Local filesystem state store.
//!
//! The record is written to a sibling temp file, flushed, synced and renamed
//! over the target, so an interrupted write leaves the previous record intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::StateRecord;
use crate::storage::StateStore;

/// State stored as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    path: PathBuf,
}

impl LocalStateStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::persistence(parent, e))?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.tmp_path();
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|e| AppError::persistence(&tmp, e))?;
        file.write_all(bytes)
            .await
            .map_err(|e| AppError::persistence(&tmp, e))?;
        file.flush()
            .await
            .map_err(|e| AppError::persistence(&tmp, e))?;
        file.sync_all()
            .await
            .map_err(|e| AppError::persistence(&tmp, e))?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::persistence(&self.path, e))?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::persistence(&self.path, e)),
        }
    }
}

#[async_trait]
impl StateStore for LocalStateStore {
    async fn load(&self) -> Result<Option<StateRecord>> {
        match self.read_bytes().await? {
            Some(bytes) => {
                let record = StateRecord::from_stored_json(&bytes)
                    .map_err(|e| AppError::persistence(&self.path, e))?;
                if record.is_none() {
                    log::debug!("State at {} has no last_hash", self.path.display());
                }
                Ok(record)
            }
            None => {
                log::debug!("No state at {}", self.path.display());
                Ok(None)
            }
        }
    }

    async fn save(&self, record: &StateRecord) -> Result<()> {
        let json = record
            .to_pretty_json()
            .map_err(|e| AppError::persistence(&self.path, e))?;
        self.write_bytes(json.as_bytes()).await?;
        log::debug!("State saved to {}", self.path.display());
        Ok(())
    }
}
