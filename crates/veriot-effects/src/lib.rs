//! # VerIoT Effects - Layer 3: Ledger Handlers
//!
//! Stateless-to-the-caller implementations of [`veriot_core::LedgerEffects`].
//!
//! - [`MemoryLedgerHandler`]: process-local world state, used by tests and
//!   short-lived tooling.
//! - [`FilesystemLedgerHandler`]: one file per key under a base directory;
//!   survives restarts.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Ledger handler implementations
pub mod ledger;

pub use ledger::{FilesystemLedgerHandler, MemoryLedgerHandler};
