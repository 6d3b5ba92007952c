//! Transaction surface: every public operation as a discrete invocation.
//!
//! Invocations deserialize from JSON such as
//!
//! ```json
//! {"function": "SubmitData", "deviceID": "dev-1", "timestamp": "t0", "data": "temp=21.5"}
//! ```

use crate::data::DataRecordStore;
use crate::device::DeviceRegistry;
use crate::entities::{DataRecord, Device};
use crate::error::Result;
use crate::verification::VerificationWorkflow;
use serde::{Deserialize, Serialize};
use tracing::debug;
use veriot_core::{LedgerEffects, LedgerStats};

/// A single request against the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "function")]
pub enum Invocation {
    /// Register a new device
    RegisterDevice {
        /// Device ID
        #[serde(rename = "deviceID")]
        device_id: String,
        /// Registering party
        owner: String,
        /// Location descriptor
        location: String,
    },
    /// Check whether a device is registered
    DeviceExists {
        /// Device ID
        #[serde(rename = "deviceID")]
        device_id: String,
    },
    /// Load a device
    GetDevice {
        /// Device ID
        #[serde(rename = "deviceID")]
        device_id: String,
    },
    /// Submit data for a registered device
    SubmitData {
        /// Device ID
        #[serde(rename = "deviceID")]
        device_id: String,
        /// Caller-supplied timestamp
        timestamp: String,
        /// Opaque payload
        data: String,
    },
    /// Load a data record
    GetDataRecord {
        /// Device ID
        #[serde(rename = "deviceID")]
        device_id: String,
        /// Record timestamp
        timestamp: String,
    },
    /// Verify or reject a data record
    VerifyData {
        /// Device ID
        #[serde(rename = "deviceID")]
        device_id: String,
        /// Record timestamp
        timestamp: String,
        /// Acting verifier
        #[serde(rename = "verifierID")]
        verifier_id: String,
        /// `true` verifies, `false` rejects
        #[serde(rename = "isValid")]
        is_valid: bool,
    },
    /// List all records of a device
    ListDeviceRecords {
        /// Device ID
        #[serde(rename = "deviceID")]
        device_id: String,
    },
}

impl Invocation {
    /// Transaction function name
    pub fn function(&self) -> &'static str {
        match self {
            Self::RegisterDevice { .. } => "RegisterDevice",
            Self::DeviceExists { .. } => "DeviceExists",
            Self::GetDevice { .. } => "GetDevice",
            Self::SubmitData { .. } => "SubmitData",
            Self::GetDataRecord { .. } => "GetDataRecord",
            Self::VerifyData { .. } => "VerifyData",
            Self::ListDeviceRecords { .. } => "ListDeviceRecords",
        }
    }

    /// Whether executing the invocation may write to the ledger
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::RegisterDevice { .. } | Self::SubmitData { .. } | Self::VerifyData { .. }
        )
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "camelCase")]
pub enum Outcome {
    /// Device stored by `RegisterDevice`
    Registered(Device),
    /// Answer to `DeviceExists`
    Exists(bool),
    /// Device loaded by `GetDevice`
    Device(Device),
    /// Record stored by `SubmitData`
    Submitted(DataRecord),
    /// Record loaded by `GetDataRecord`
    Record(DataRecord),
    /// Record updated by `VerifyData`
    Verified(DataRecord),
    /// Records listed by `ListDeviceRecords`
    Records(Vec<DataRecord>),
}

/// Entry point dispatching invocations to the registry components.
#[derive(Debug, Clone, Copy, Default)]
pub struct IotContract {
    devices: DeviceRegistry,
    records: DataRecordStore,
    verification: VerificationWorkflow,
}

impl IotContract {
    /// Contract with default components
    pub fn new() -> Self {
        let devices = DeviceRegistry;
        let records = DataRecordStore::new(devices);
        Self {
            devices,
            records,
            verification: VerificationWorkflow::new(records),
        }
    }

    /// Device registry component
    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    /// Data record store component
    pub fn records(&self) -> &DataRecordStore {
        &self.records
    }

    /// Verification workflow component
    pub fn verification(&self) -> &VerificationWorkflow {
        &self.verification
    }

    /// Execute one invocation against `ledger`.
    pub async fn execute<L>(&self, ledger: &L, invocation: Invocation) -> Result<Outcome>
    where
        L: LedgerEffects + ?Sized,
    {
        debug!(function = invocation.function(), "Executing invocation");
        let outcome = match invocation {
            Invocation::RegisterDevice {
                device_id,
                owner,
                location,
            } => Outcome::Registered(
                self.devices
                    .register_device(ledger, &device_id, &owner, &location)
                    .await?,
            ),
            Invocation::DeviceExists { device_id } => {
                Outcome::Exists(self.devices.device_exists(ledger, &device_id).await?)
            }
            Invocation::GetDevice { device_id } => {
                Outcome::Device(self.devices.get_device(ledger, &device_id).await?)
            }
            Invocation::SubmitData {
                device_id,
                timestamp,
                data,
            } => Outcome::Submitted(
                self.records
                    .submit_data(ledger, &device_id, &timestamp, &data)
                    .await?,
            ),
            Invocation::GetDataRecord {
                device_id,
                timestamp,
            } => Outcome::Record(
                self.records
                    .get_data_record(ledger, &device_id, &timestamp)
                    .await?,
            ),
            Invocation::VerifyData {
                device_id,
                timestamp,
                verifier_id,
                is_valid,
            } => Outcome::Verified(
                self.verification
                    .verify_data(ledger, &device_id, &timestamp, &verifier_id, is_valid)
                    .await?,
            ),
            Invocation::ListDeviceRecords { device_id } => {
                Outcome::Records(self.records.list_device_records(ledger, &device_id).await?)
            }
        };
        Ok(outcome)
    }

    /// Ledger usage statistics
    pub async fn ledger_stats<L>(&self, ledger: &L) -> Result<LedgerStats>
    where
        L: LedgerEffects + ?Sized,
    {
        Ok(ledger.stats().await?)
    }
}
