//! VerIoT CLI Library
//!
//! Configuration, logging setup and command handlers behind the `veriot`
//! binary.

/// Command handlers for CLI operations
pub mod commands;

/// Configuration management for the CLI
pub mod config;

/// Tracing subscriber setup
pub mod logging;

pub use config::{Config, ConfigError, LedgerBackend, LedgerConfig};
