//! Command handlers
//!
//! Every subcommand becomes one [`Invocation`] executed against the configured
//! ledger; the outcome is printed as JSON on stdout.

pub mod data;
pub mod device;
pub mod ledger;

use crate::config::{Config, LedgerBackend};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use veriot_core::LedgerEffects;
use veriot_effects::{FilesystemLedgerHandler, MemoryLedgerHandler};
use veriot_registry::{Invocation, IotContract, Outcome};

/// Shared handle to whichever ledger backend is configured
pub type LedgerHandle = Arc<dyn LedgerEffects>;

/// Open the ledger named by `config`.
pub fn open_ledger(config: &Config) -> anyhow::Result<LedgerHandle> {
    match config.ledger.backend {
        LedgerBackend::Filesystem => {
            let data_dir = &config.ledger.data_dir;
            let handler = FilesystemLedgerHandler::new(data_dir)
                .with_context(|| format!("failed to open ledger at {}", data_dir.display()))?;
            Ok(Arc::new(handler))
        }
        LedgerBackend::Memory => {
            warn!("Using the memory ledger backend; nothing will persist after exit");
            Ok(Arc::new(MemoryLedgerHandler::new()))
        }
    }
}

/// Execute `invocation` and return its outcome.
pub async fn execute(ledger: &LedgerHandle, invocation: Invocation) -> anyhow::Result<Outcome> {
    let function = invocation.function();
    let outcome = IotContract::new()
        .execute(ledger.as_ref(), invocation)
        .await
        .with_context(|| format!("{function} failed"))?;
    info!(function, "Invocation completed");
    Ok(outcome)
}

/// Execute `invocation` and print the outcome.
pub async fn execute_and_print(
    ledger: &LedgerHandle,
    invocation: Invocation,
) -> anyhow::Result<()> {
    let outcome = execute(ledger, invocation).await?;
    print_json(&outcome)
}

/// Pretty-print any serializable value on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
