//! Ledger effects: the key-value world state the domain layer reads and writes.
//!
//! Handlers are expected to be deterministic: the same key read at the same
//! state always yields the same payload. Absence is a normal `Ok(None)`
//! result and must never be reported as an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Errors raised by a ledger handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A read from the world state failed
    #[error("Ledger read failed: {0}")]
    ReadFailed(String),

    /// A write to the world state failed
    #[error("Ledger write failed: {0}")]
    WriteFailed(String),

    /// The key cannot be stored by this backend
    #[error("Invalid ledger key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },

    /// The handler was constructed with an unusable configuration
    #[error("Ledger configuration error: {reason}")]
    ConfigurationError {
        /// What is wrong with the configuration
        reason: String,
    },
}

/// Snapshot of ledger usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Number of populated keys
    pub key_count: u64,
    /// Sum of payload sizes in bytes
    pub total_size: u64,
    /// Backend name (`memory`, `filesystem`, ...)
    pub backend_type: String,
}

/// World-state access used by every domain operation.
///
/// Each call is treated as synchronous and atomic by callers. Isolation
/// between concurrent writers is the handler's responsibility.
#[async_trait]
pub trait LedgerEffects: Send + Sync {
    /// Return the most recently written payload for `key`, or `None` if the
    /// key was never written.
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Associate `key` with `value`, replacing any prior payload.
    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// List populated keys starting with `prefix`, in ascending order.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, LedgerError>;

    /// Report usage statistics.
    async fn stats(&self) -> Result<LedgerStats, LedgerError>;
}

#[async_trait]
impl<T: LedgerEffects + ?Sized> LedgerEffects for Arc<T> {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get_state(key).await
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        (**self).put_state(key, value).await
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, LedgerError> {
        (**self).list_keys(prefix).await
    }

    async fn stats(&self) -> Result<LedgerStats, LedgerError> {
        (**self).stats().await
    }
}

#[async_trait]
impl<T: LedgerEffects + ?Sized> LedgerEffects for Box<T> {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get_state(key).await
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        (**self).put_state(key, value).await
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, LedgerError> {
        (**self).list_keys(prefix).await
    }

    async fn stats(&self) -> Result<LedgerStats, LedgerError> {
        (**self).stats().await
    }
}
