//! # VerIoT Core - Layer 1: Foundation
//!
//! **Purpose**: Define the contract every ledger backend must satisfy and the
//! composite-key encoding used to address structured entities.
//!
//! # Architecture Constraints
//!
//! - YES `LedgerEffects` trait and its error/statistics types
//! - YES Pure key construction and parsing
//! - NO ledger handler implementations (those live in `veriot-effects`)
//! - NO domain entities (those live in `veriot-registry`)
//!
//! ## Core Concepts
//!
//! - **World state**: a durable mapping from string key to byte payload.
//! - **Composite key**: a single storage key derived from a category label and
//!   an ordered list of attribute strings. See [`keys`] for the encoding.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Ledger effect trait and its error types
pub mod effects;

/// Composite and simple key construction
pub mod keys;

pub use effects::{LedgerEffects, LedgerError, LedgerStats};
pub use keys::{
    create_composite_key, partial_composite_key, split_composite_key, validate_simple_key,
    KeyError, COMPOSITE_KEY_NAMESPACE, MAX_UNICODE_RUNE,
};
