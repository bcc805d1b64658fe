//! Type definitions for vaultsync configuration

mod config_types;
mod file_mode;

pub use config_types::*;
pub use file_mode::FileMode;
