//! Device commands

use super::{execute_and_print, LedgerHandle};
use veriot_registry::Invocation;

/// Register a new device
pub async fn register(
    ledger: &LedgerHandle,
    device_id: &str,
    owner: &str,
    location: &str,
) -> anyhow::Result<()> {
    execute_and_print(
        ledger,
        Invocation::RegisterDevice {
            device_id: device_id.to_string(),
            owner: owner.to_string(),
            location: location.to_string(),
        },
    )
    .await
}

/// Report whether a device is registered
pub async fn exists(ledger: &LedgerHandle, device_id: &str) -> anyhow::Result<()> {
    execute_and_print(
        ledger,
        Invocation::DeviceExists {
            device_id: device_id.to_string(),
        },
    )
    .await
}

/// Show a registered device
pub async fn show(ledger: &LedgerHandle, device_id: &str) -> anyhow::Result<()> {
    execute_and_print(
        ledger,
        Invocation::GetDevice {
            device_id: device_id.to_string(),
        },
    )
    .await
}
