//! Raw invocation and ledger inspection commands

use super::{execute_and_print, print_json, LedgerHandle};
use anyhow::Context;
use tokio::io::AsyncReadExt;
use veriot_registry::{Invocation, IotContract};

/// Parse an invocation from JSON text.
pub fn parse_invocation(json: &str) -> anyhow::Result<Invocation> {
    serde_json::from_str(json).context("invocation is not a valid transaction document")
}

/// Execute an invocation given as JSON, or read from stdin when `json` is `-`.
pub async fn invoke(ledger: &LedgerHandle, json: &str) -> anyhow::Result<()> {
    let invocation = if json == "-" {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("failed to read invocation from stdin")?;
        parse_invocation(&buffer)?
    } else {
        parse_invocation(json)?
    };
    execute_and_print(ledger, invocation).await
}

/// Print ledger usage statistics
pub async fn stats(ledger: &LedgerHandle) -> anyhow::Result<()> {
    let stats = IotContract::new()
        .ledger_stats(ledger.as_ref())
        .await
        .context("failed to read ledger statistics")?;
    print_json(&stats)
}
