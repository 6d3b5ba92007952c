//! Ledger entities and their stored JSON form.

use crate::error::{EntityKind, RegistryError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Device lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Accepting data submissions
    Active,
    /// Retired
    Inactive,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Inactive => f.write_str("inactive"),
        }
    }
}

/// Verification status of a data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Submitted, not yet verified
    Pending,
    /// Accepted by a verifier
    Verified,
    /// Rejected by a verifier
    Rejected,
}

impl RecordStatus {
    /// Status reached by a verification with outcome `is_valid`.
    ///
    /// The result does not depend on the current status.
    pub fn transition(is_valid: bool) -> Self {
        if is_valid {
            Self::Verified
        } else {
            Self::Rejected
        }
    }

    /// Whether a verifier has already acted on the record
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Verified => f.write_str("verified"),
            Self::Rejected => f.write_str("rejected"),
        }
    }
}

/// A registered IoT device, stored verbatim under its `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Globally unique device identifier and storage key
    pub id: String,
    /// Registering party
    pub owner: String,
    /// Free-form location descriptor
    pub location: String,
    /// Lifecycle status
    pub status: DeviceStatus,
}

impl Device {
    /// A freshly registered, active device
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            location: location.into(),
            status: DeviceStatus::Active,
        }
    }
}

/// Data submitted by a device at a caller-supplied timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRecord {
    /// Submitting device
    #[serde(rename = "deviceID")]
    pub device_id: String,
    /// Caller-supplied timestamp; with `device_id` forms the record key
    pub timestamp: String,
    /// Opaque payload
    pub data: String,
    /// Verification status
    pub status: RecordStatus,
    /// Verifier that last acted on the record. Never `Some("")`.
    #[serde(
        rename = "verifierID",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub verifier_id: Option<String>,
}

impl DataRecord {
    /// A freshly submitted, pending record
    pub fn new(
        device_id: impl Into<String>,
        timestamp: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp: timestamp.into(),
            data: data.into(),
            status: RecordStatus::Pending,
            verifier_id: None,
        }
    }

    /// Record a verification outcome, replacing any previous status and
    /// verifier.
    pub fn apply_verification(&mut self, verifier_id: &str, is_valid: bool) {
        self.status = RecordStatus::transition(is_valid);
        self.verifier_id = (!verifier_id.is_empty()).then(|| verifier_id.to_string());
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

/// An entity with a stored JSON form.
pub trait LedgerEntity: Serialize + DeserializeOwned {
    /// Kind reported in errors
    const KIND: EntityKind;

    /// Encode for storage
    fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| RegistryError::serialization(Self::KIND, e))
    }

    /// Decode bytes read from `key`
    fn from_bytes(key: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| RegistryError::deserialization(Self::KIND, key, e))
    }
}

impl LedgerEntity for Device {
    const KIND: EntityKind = EntityKind::Device;
}

impl LedgerEntity for DataRecord {
    const KIND: EntityKind = EntityKind::DataRecord;
}
