//! # VerIoT Testkit
//!
//! Ledger doubles for exercising failure paths that real handlers rarely hit.
//!
//! [`FaultyLedger`] wraps a [`MemoryLedgerHandler`] and can be told to fail
//! reads or writes. It also counts calls, which lets tests assert that an
//! operation wrote at most once, or not at all.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use veriot_core::{LedgerEffects, LedgerError, LedgerStats};
use veriot_effects::MemoryLedgerHandler;

#[derive(Debug, Default)]
struct FaultState {
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

/// In-memory ledger with injectable I/O failures and call counters.
///
/// Clones share state, so a test can keep a handle while the code under test
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct FaultyLedger {
    inner: MemoryLedgerHandler,
    state: Arc<FaultState>,
}

impl FaultyLedger {
    /// Healthy ledger with no faults armed
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail (or succeed again)
    pub fn fail_reads(&self, fail: bool) {
        self.state.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Successful and failed `get_state` calls so far
    pub fn reads(&self) -> usize {
        self.state.reads.load(Ordering::SeqCst)
    }

    /// Attempted `put_state` calls so far, including failed ones
    pub fn writes(&self) -> usize {
        self.state.writes.load(Ordering::SeqCst)
    }

    /// Zero the call counters
    pub fn reset_counters(&self) {
        self.state.reads.store(0, Ordering::SeqCst);
        self.state.writes.store(0, Ordering::SeqCst);
    }

    /// The wrapped handler, bypassing faults and counters
    pub fn inner(&self) -> &MemoryLedgerHandler {
        &self.inner
    }
}

#[async_trait]
impl LedgerEffects for FaultyLedger {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.state.reads.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_reads.load(Ordering::SeqCst) {
            tracing::debug!(key = ?key, "Injected read failure");
            return Err(LedgerError::ReadFailed("injected read failure".to_string()));
        }
        self.inner.get_state(key).await
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.state.writes.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_writes.load(Ordering::SeqCst) {
            tracing::debug!(key = ?key, "Injected write failure");
            return Err(LedgerError::WriteFailed("injected write failure".to_string()));
        }
        self.inner.put_state(key, value).await
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, LedgerError> {
        if self.state.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::ReadFailed("injected read failure".to_string()));
        }
        self.inner.list_keys(prefix).await
    }

    async fn stats(&self) -> Result<LedgerStats, LedgerError> {
        let mut stats = self.inner.stats().await?;
        stats.backend_type = "faulty-memory".to_string();
        Ok(stats)
    }
}
