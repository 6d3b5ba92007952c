//! Effect traits consumed by the domain layer.

/// World-state ledger access
pub mod ledger;

pub use ledger::{LedgerEffects, LedgerError, LedgerStats};
