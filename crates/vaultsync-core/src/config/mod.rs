//! Configuration loading and management

mod loader;

pub use loader::{generate_default_config, SyncConfig, CONFIG_FILE_NAMES};
