//! # vaultsync-core
//!
//! Core library for vaultsync providing:
//! - Configuration file discovery and parsing (vaultsync.yaml)
//! - Type definitions for vaults, secret groups, and mappings
//! - Mapping and request validation

pub mod config;
pub mod error;
pub mod types;

pub use config::SyncConfig;
pub use error::{Error, Result};
