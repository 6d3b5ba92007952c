//! Data record and verification commands

use super::{execute_and_print, LedgerHandle};
use veriot_registry::Invocation;

/// Submit data for a registered device
pub async fn submit(
    ledger: &LedgerHandle,
    device_id: &str,
    timestamp: &str,
    data: &str,
) -> anyhow::Result<()> {
    execute_and_print(
        ledger,
        Invocation::SubmitData {
            device_id: device_id.to_string(),
            timestamp: timestamp.to_string(),
            data: data.to_string(),
        },
    )
    .await
}

/// Show one data record
pub async fn show(ledger: &LedgerHandle, device_id: &str, timestamp: &str) -> anyhow::Result<()> {
    execute_and_print(
        ledger,
        Invocation::GetDataRecord {
            device_id: device_id.to_string(),
            timestamp: timestamp.to_string(),
        },
    )
    .await
}

/// Verify (or, with `reject`, reject) a data record
pub async fn verify(
    ledger: &LedgerHandle,
    device_id: &str,
    timestamp: &str,
    verifier_id: &str,
    reject: bool,
) -> anyhow::Result<()> {
    execute_and_print(
        ledger,
        Invocation::VerifyData {
            device_id: device_id.to_string(),
            timestamp: timestamp.to_string(),
            verifier_id: verifier_id.to_string(),
            is_valid: !reject,
        },
    )
    .await
}

/// List every record of a device
pub async fn list(ledger: &LedgerHandle, device_id: &str) -> anyhow::Result<()> {
    execute_and_print(
        ledger,
        Invocation::ListDeviceRecords {
            device_id: device_id.to_string(),
        },
    )
    .await
}
