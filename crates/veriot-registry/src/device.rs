//! Device registry: devices keyed verbatim by their ID.

use crate::entities::{Device, LedgerEntity};
use crate::error::{EntityKind, RegistryError, Result};
use tracing::{debug, info};
use veriot_core::{validate_simple_key, LedgerEffects};

/// Owns device entities and enforces one registration per device ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceRegistry;

impl DeviceRegistry {
    /// Register a new device with `status = active`.
    ///
    /// Fails with [`RegistryError::AlreadyExists`] if `device_id` is already
    /// populated; the stored device is left untouched in that case.
    pub async fn register_device<L>(
        &self,
        ledger: &L,
        device_id: &str,
        owner: &str,
        location: &str,
    ) -> Result<Device>
    where
        L: LedgerEffects + ?Sized,
    {
        validate_simple_key(device_id)?;
        if self.device_exists(ledger, device_id).await? {
            return Err(RegistryError::already_exists(EntityKind::Device, device_id));
        }

        let device = Device::new(device_id, owner, location);
        ledger.put_state(device_id, device.to_bytes()?).await?;

        info!(device_id = %device_id, owner = %owner, "Device registered");
        Ok(device)
    }

    /// Whether a non-empty value is stored under `device_id`.
    ///
    /// Absence is `Ok(false)`; only a failed read is an error. An ID that
    /// could never have been registered is absent without a ledger read.
    pub async fn device_exists<L>(&self, ledger: &L, device_id: &str) -> Result<bool>
    where
        L: LedgerEffects + ?Sized,
    {
        if validate_simple_key(device_id).is_err() {
            debug!(device_id = ?device_id, "Not a device key");
            return Ok(false);
        }
        let exists = ledger
            .get_state(device_id)
            .await?
            .is_some_and(|bytes| !bytes.is_empty());
        debug!(device_id = %device_id, exists, "Checked device existence");
        Ok(exists)
    }

    /// Load a registered device.
    pub async fn get_device<L>(&self, ledger: &L, device_id: &str) -> Result<Device>
    where
        L: LedgerEffects + ?Sized,
    {
        if validate_simple_key(device_id).is_err() {
            return Err(RegistryError::not_found(EntityKind::Device, device_id));
        }
        match ledger.get_state(device_id).await? {
            Some(bytes) if !bytes.is_empty() => Device::from_bytes(device_id, &bytes),
            _ => Err(RegistryError::not_found(EntityKind::Device, device_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DeviceStatus;
    use assert_matches::assert_matches;
    use veriot_core::KeyError;
    use veriot_effects::MemoryLedgerHandler;

    #[tokio::test]
    async fn test_register_then_get() {
        let ledger = MemoryLedgerHandler::new();
        let registry = DeviceRegistry;

        let registered = registry
            .register_device(&ledger, "dev-1", "alice", "lab-A")
            .await
            .unwrap();
        let loaded = registry.get_device(&ledger, "dev-1").await.unwrap();

        assert_eq!(registered, loaded);
        assert_eq!(loaded.owner, "alice");
        assert_eq!(loaded.location, "lab-A");
        assert_eq!(loaded.status, DeviceStatus::Active);
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first() {
        let ledger = MemoryLedgerHandler::new();
        let registry = DeviceRegistry;
        registry
            .register_device(&ledger, "dev-1", "alice", "lab-A")
            .await
            .unwrap();

        let second = registry
            .register_device(&ledger, "dev-1", "mallory", "lab-B")
            .await;
        assert_matches!(
            second,
            Err(RegistryError::AlreadyExists {
                kind: EntityKind::Device,
                ref key,
            }) if key == "dev-1"
        );

        let stored = registry.get_device(&ledger, "dev-1").await.unwrap();
        assert_eq!(stored.owner, "alice");
        assert_eq!(stored.location, "lab-A");
    }

    #[tokio::test]
    async fn test_exists_is_false_for_unknown_device() {
        let ledger = MemoryLedgerHandler::new();
        assert!(!DeviceRegistry.device_exists(&ledger, "ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_value_counts_as_absent() {
        let ledger = MemoryLedgerHandler::new();
        ledger.put_state("dev-1", Vec::new()).await.unwrap();

        assert!(!DeviceRegistry.device_exists(&ledger, "dev-1").await.unwrap());
        assert_matches!(
            DeviceRegistry.get_device(&ledger, "dev-1").await,
            Err(RegistryError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_get_missing_device() {
        let ledger = MemoryLedgerHandler::new();
        assert_matches!(
            DeviceRegistry.get_device(&ledger, "ghost").await,
            Err(RegistryError::NotFound {
                kind: EntityKind::Device,
                ..
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_device_bytes() {
        let ledger = MemoryLedgerHandler::new();
        ledger.put_state("dev-1", b"{oops".to_vec()).await.unwrap();
        assert_matches!(
            DeviceRegistry.get_device(&ledger, "dev-1").await,
            Err(RegistryError::Deserialization {
                kind: EntityKind::Device,
                ..
            })
        );
    }

    #[tokio::test]
    async fn test_record_keys_are_not_devices() {
        let ledger = MemoryLedgerHandler::new();
        DeviceRegistry
            .register_device(&ledger, "dev-1", "alice", "lab-A")
            .await
            .unwrap();
        crate::data::DataRecordStore::default()
            .submit_data(&ledger, "dev-1", "t0", "x")
            .await
            .unwrap();
        let record_key = crate::data::data_record_key("dev-1", "t0").unwrap();

        assert!(!DeviceRegistry.device_exists(&ledger, &record_key).await.unwrap());
        assert_matches!(
            DeviceRegistry.get_device(&ledger, &record_key).await,
            Err(RegistryError::NotFound {
                kind: EntityKind::Device,
                ..
            })
        );
        assert!(!DeviceRegistry.device_exists(&ledger, "").await.unwrap());
    }

    #[tokio::test]
    async fn test_reserved_characters_rejected_anywhere_in_device_id() {
        let ledger = MemoryLedgerHandler::new();
        for id in ["a\u{0}b", "dev\u{10FFFF}"] {
            assert_matches!(
                DeviceRegistry.register_device(&ledger, id, "alice", "lab-A").await,
                Err(RegistryError::InvalidKey(KeyError::InvalidComponent { .. }))
            );
        }
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_device_id_must_be_a_simple_key() {
        let ledger = MemoryLedgerHandler::new();
        assert_matches!(
            DeviceRegistry.register_device(&ledger, "", "alice", "lab-A").await,
            Err(RegistryError::InvalidKey(KeyError::EmptyKey))
        );
        assert_matches!(
            DeviceRegistry
                .register_device(&ledger, "\u{0}DataRecord\u{0}", "alice", "lab-A")
                .await,
            Err(RegistryError::InvalidKey(_))
        );
        assert!(ledger.is_empty().await);
    }
}
