//! Data record store: records keyed by `("DataRecord", [device_id, timestamp])`.

use crate::device::DeviceRegistry;
use crate::entities::{DataRecord, LedgerEntity};
use crate::error::{EntityKind, RegistryError, Result};
use tracing::{debug, info};
use veriot_core::{create_composite_key, partial_composite_key, split_composite_key, LedgerEffects};

/// Composite-key category for data records
pub const DATA_RECORD_CATEGORY: &str = "DataRecord";

/// Storage key of the record submitted by `device_id` at `timestamp`.
pub fn data_record_key(device_id: &str, timestamp: &str) -> Result<String> {
    Ok(create_composite_key(DATA_RECORD_CATEGORY, &[device_id, timestamp])?)
}

/// Owns data-record entities and enforces that every record refers to a
/// registered device.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataRecordStore {
    devices: DeviceRegistry,
}

impl DataRecordStore {
    /// Store backed by `devices` for referential checks
    pub fn new(devices: DeviceRegistry) -> Self {
        Self { devices }
    }

    /// Store a pending record for a registered device.
    ///
    /// Resubmitting the same `(device_id, timestamp)` overwrites the previous
    /// record, including any verification already applied to it.
    pub async fn submit_data<L>(
        &self,
        ledger: &L,
        device_id: &str,
        timestamp: &str,
        data: &str,
    ) -> Result<DataRecord>
    where
        L: LedgerEffects + ?Sized,
    {
        if !self.devices.device_exists(ledger, device_id).await? {
            return Err(RegistryError::DeviceNotRegistered {
                device_id: device_id.to_string(),
            });
        }

        let record = DataRecord::new(device_id, timestamp, data);
        self.put_data_record(ledger, &record).await?;

        info!(device_id = %device_id, timestamp = %timestamp, "Data record submitted");
        Ok(record)
    }

    /// Load the record submitted by `device_id` at `timestamp`.
    pub async fn get_data_record<L>(
        &self,
        ledger: &L,
        device_id: &str,
        timestamp: &str,
    ) -> Result<DataRecord>
    where
        L: LedgerEffects + ?Sized,
    {
        let key = data_record_key(device_id, timestamp)?;
        self.load(ledger, &key)
            .await?
            .ok_or_else(|| RegistryError::not_found(EntityKind::DataRecord, key))
    }

    /// All records of `device_id`, ordered by timestamp.
    pub async fn list_device_records<L>(
        &self,
        ledger: &L,
        device_id: &str,
    ) -> Result<Vec<DataRecord>>
    where
        L: LedgerEffects + ?Sized,
    {
        let prefix = partial_composite_key(DATA_RECORD_CATEGORY, &[device_id])?;
        let keys = ledger.list_keys(&prefix).await?;

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(record) = self.load(ledger, &key).await? {
                records.push(record);
            }
        }
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        debug!(device_id = %device_id, count = records.len(), "Listed device records");
        Ok(records)
    }

    /// Write `record` under its composite key, replacing any prior value.
    pub(crate) async fn put_data_record<L>(&self, ledger: &L, record: &DataRecord) -> Result<()>
    where
        L: LedgerEffects + ?Sized,
    {
        let key = data_record_key(&record.device_id, &record.timestamp)?;
        ledger.put_state(&key, record.to_bytes()?).await?;
        Ok(())
    }

    /// Read and decode the record at `key`, checking that it is the record
    /// the key names.
    async fn load<L>(&self, ledger: &L, key: &str) -> Result<Option<DataRecord>>
    where
        L: LedgerEffects + ?Sized,
    {
        let bytes = match ledger.get_state(key).await? {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Ok(None),
        };
        let record = DataRecord::from_bytes(key, &bytes)?;

        let (_, attributes) = split_composite_key(key)?;
        if attributes != [record.device_id.as_str(), record.timestamp.as_str()] {
            return Err(RegistryError::deserialization(
                EntityKind::DataRecord,
                key,
                format!(
                    "record for ({}, {}) stored under a different key",
                    record.device_id, record.timestamp
                ),
            ));
        }
        Ok(Some(record))
    }
}
