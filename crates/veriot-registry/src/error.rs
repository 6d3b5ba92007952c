//! Registry errors

use serde::{Deserialize, Serialize};
use std::fmt;
use veriot_core::{KeyError, LedgerError};

/// Kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A registered IoT device
    Device,
    /// A data record submitted by a device
    DataRecord,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device => f.write_str("device"),
            Self::DataRecord => f.write_str("data record"),
        }
    }
}

/// Errors returned by registry, record store and verification operations.
///
/// Keys are rendered with `{:?}` so composite-key delimiters stay visible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Registration attempted for a key that is already populated
    #[error("{kind} {key:?} already exists")]
    AlreadyExists {
        /// Entity kind
        kind: EntityKind,
        /// Storage key
        key: String,
    },

    /// Read of an absent key
    #[error("{kind} {key:?} does not exist")]
    NotFound {
        /// Entity kind
        kind: EntityKind,
        /// Storage key
        key: String,
    },

    /// Data submitted for a device that was never registered
    #[error("device {device_id:?} is not registered")]
    DeviceNotRegistered {
        /// The unknown device
        device_id: String,
    },

    /// Stored bytes do not parse as the expected entity
    #[error("failed to deserialize {kind} at {key:?}: {message}")]
    Deserialization {
        /// Entity kind
        kind: EntityKind,
        /// Storage key
        key: String,
        /// Parser message
        message: String,
    },

    /// Entity could not be encoded for storage
    #[error("failed to serialize {kind}: {message}")]
    Serialization {
        /// Entity kind
        kind: EntityKind,
        /// Encoder message
        message: String,
    },

    /// A key or key component was rejected before touching the ledger
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    /// The ledger read or write itself failed
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

impl RegistryError {
    /// Create an already-exists error
    pub fn already_exists(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Create a deserialization error
    pub fn deserialization(
        kind: EntityKind,
        key: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        Self::Deserialization {
            kind,
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a serialization error
    pub fn serialization(kind: EntityKind, message: impl fmt::Display) -> Self {
        Self::Serialization {
            kind,
            message: message.to_string(),
        }
    }

    /// Whether the error came from the ledger collaborator rather than from
    /// registry validation
    pub fn is_ledger_failure(&self) -> bool {
        matches!(self, Self::Ledger(_))
    }
}
