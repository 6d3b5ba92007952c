//! Filesystem ledger handler
//!
//! Each key is stored in its own file named by the BLAKE3 hash of the key, so
//! arbitrary keys (including composite keys containing `U+0000`) map to safe
//! filenames. The file holds a JSON envelope with the original key and the
//! hex-encoded payload, which lets `list_keys` recover keys from disk.
//!
//! Writes go to a temporary file first and are renamed into place.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use veriot_core::{LedgerEffects, LedgerError, LedgerStats};

const ENTRY_EXTENSION: &str = "entry";
const TEMP_EXTENSION: &str = "tmp";

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    value: String,
}

/// World state persisted as one file per key under a base directory.
#[derive(Debug, Clone)]
pub struct FilesystemLedgerHandler {
    base_path: PathBuf,
}

impl FilesystemLedgerHandler {
    /// Open (creating if needed) a ledger rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path).map_err(|e| LedgerError::ConfigurationError {
            reason: format!(
                "Failed to create ledger directory {}: {e}",
                base_path.display()
            ),
        })?;

        info!(path = %base_path.display(), "Opened filesystem ledger");
        Ok(Self { base_path })
    }

    /// Directory holding the entry files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let hash = blake3::hash(key.as_bytes());
        self.base_path.join(format!("{}.{ENTRY_EXTENSION}", hash.to_hex()))
    }

    async fn read_entry(path: &Path) -> Result<Option<StoredEntry>, LedgerError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(LedgerError::ReadFailed(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        let entry = serde_json::from_slice(&bytes).map_err(|e| {
            LedgerError::ReadFailed(format!("Corrupt ledger entry {}: {e}", path.display()))
        })?;
        Ok(Some(entry))
    }

    async fn all_entries(&self) -> Result<Vec<StoredEntry>, LedgerError> {
        let mut dir = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| LedgerError::ReadFailed(format!("Failed to list ledger: {e}")))?;

        let mut entries = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| LedgerError::ReadFailed(format!("Failed to list ledger: {e}")))?
        {
            let path = item.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            if let Some(entry) = Self::read_entry(&path).await? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl LedgerEffects for FilesystemLedgerHandler {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let path = self.entry_path(key);
        let Some(entry) = Self::read_entry(&path).await? else {
            debug!(path = %path.display(), "Ledger key absent");
            return Ok(None);
        };

        // Hash collisions are not expected, but a mismatched key must never
        // be returned as this key's value.
        if entry.key != key {
            return Err(LedgerError::ReadFailed(format!(
                "Ledger entry {} belongs to a different key",
                path.display()
            )));
        }

        let value = hex::decode(&entry.value).map_err(|e| {
            LedgerError::ReadFailed(format!("Corrupt payload in {}: {e}", path.display()))
        })?;
        Ok(Some(value))
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::InvalidKey {
                reason: "Key cannot be empty".to_string(),
            });
        }

        let entry = StoredEntry {
            key: key.to_string(),
            value: hex::encode(&value),
        };
        let bytes = serde_json::to_vec(&entry)
            .map_err(|e| LedgerError::WriteFailed(format!("Failed to encode entry: {e}")))?;

        let path = self.entry_path(key);
        let temp_path = path.with_extension(TEMP_EXTENSION);
        fs::write(&temp_path, bytes)
            .await
            .map_err(|e| LedgerError::WriteFailed(format!("Failed to write file: {e}")))?;
        if let Err(e) = fs::rename(&temp_path, &path).await {
            // Best effort; the rename error is what gets reported.
            let _ = fs::remove_file(&temp_path).await;
            return Err(LedgerError::WriteFailed(format!("Failed to commit file: {e}")));
        }

        debug!(path = %path.display(), size = value.len(), "Ledger key written");
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, LedgerError> {
        let mut keys: Vec<String> = self
            .all_entries()
            .await?
            .into_iter()
            .map(|entry| entry.key)
            .filter(|key| key.starts_with(prefix))
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn stats(&self) -> Result<LedgerStats, LedgerError> {
        let entries = self.all_entries().await?;
        Ok(LedgerStats {
            key_count: entries.len() as u64,
            // Two hex characters per payload byte
            total_size: entries.iter().map(|e| (e.value.len() / 2) as u64).sum(),
            backend_type: "filesystem".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entry_path_is_stable_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = FilesystemLedgerHandler::new(dir.path()).unwrap();
        assert_eq!(ledger.entry_path("dev-1"), ledger.entry_path("dev-1"));
        assert_ne!(ledger.entry_path("dev-1"), ledger.entry_path("dev-2"));
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = FilesystemLedgerHandler::new(dir.path()).unwrap();
        ledger.put_state("dev-1", b"{}".to_vec()).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(names.len(), 1);
        assert_eq!(
            names[0].extension().and_then(|e| e.to_str()),
            Some(ENTRY_EXTENSION)
        );
    }

    #[tokio::test]
    async fn test_failed_commit_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = FilesystemLedgerHandler::new(dir.path()).unwrap();

        // A non-empty directory at the entry path makes the rename fail.
        let entry_path = ledger.entry_path("dev-1");
        std::fs::create_dir(&entry_path).unwrap();
        std::fs::write(entry_path.join("blocker"), b"").unwrap();

        assert!(matches!(
            ledger.put_state("dev-1", b"{}".to_vec()).await,
            Err(LedgerError::WriteFailed(_))
        ));
        assert!(!entry_path.with_extension(TEMP_EXTENSION).exists());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = FilesystemLedgerHandler::new(dir.path()).unwrap();
        std::fs::write(ledger.entry_path("dev-1"), b"not json").unwrap();
        assert!(matches!(
            ledger.get_state("dev-1").await,
            Err(LedgerError::ReadFailed(_))
        ));
    }
}
