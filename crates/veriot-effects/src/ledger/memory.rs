//! In-memory ledger handler

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use veriot_core::{LedgerEffects, LedgerError, LedgerStats};

/// In-memory world state.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerHandler {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryLedgerHandler {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of populated keys (for testing)
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether no key has been written (for testing)
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl LedgerEffects for MemoryLedgerHandler {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::InvalidKey {
                reason: "Key cannot be empty".to_string(),
            });
        }
        let mut data = self.data.write().await;
        data.insert(key.to_string(), value);
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, LedgerError> {
        let data = self.data.read().await;
        Ok(data
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    async fn stats(&self) -> Result<LedgerStats, LedgerError> {
        let data = self.data.read().await;
        Ok(LedgerStats {
            key_count: data.len() as u64,
            total_size: data.values().map(|v| v.len() as u64).sum(),
            backend_type: "memory".to_string(),
        })
    }
}
