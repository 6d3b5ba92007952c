//! # VerIoT Registry - Layer 2: Domain
//!
//! **Purpose**: Register IoT devices, store the data they submit, and move
//! submitted records through verification, all against a world-state ledger
//! supplied by the caller.
//!
//! # Architecture Constraints
//!
//! - YES Entity types and their stored JSON form
//! - YES Uniqueness, referential integrity and status transitions
//! - NO ledger handlers (use `veriot-effects`)
//! - NO state held across calls; every operation takes the ledger explicitly
//!
//! ## Components
//!
//! - [`DeviceRegistry`]: devices keyed verbatim by ID, registered once.
//! - [`DataRecordStore`]: records keyed by `("DataRecord", [device_id, timestamp])`;
//!   a record can only be created for a registered device.
//! - [`VerificationWorkflow`]: `pending -> verified | rejected`.
//! - [`IotContract`]: dispatches [`Invocation`]s to the components above.
//!
//! Each operation performs its validation reads first and writes at most once,
//! so a failed validation never leaves a partial write behind.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Transaction surface
pub mod contract;

/// Data record store
pub mod data;

/// Device registry
pub mod device;

/// Entity types and stored form
pub mod entities;

/// Registry error types
pub mod error;

/// Verification workflow
pub mod verification;

pub use contract::{Invocation, IotContract, Outcome};
pub use data::{data_record_key, DataRecordStore, DATA_RECORD_CATEGORY};
pub use device::DeviceRegistry;
pub use entities::{DataRecord, Device, DeviceStatus, LedgerEntity, RecordStatus};
pub use error::{EntityKind, RegistryError, Result};
pub use verification::VerificationWorkflow;
