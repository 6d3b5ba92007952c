//! World-state ledger handlers

mod filesystem;
mod memory;

pub use filesystem::FilesystemLedgerHandler;
pub use memory::MemoryLedgerHandler;
