//! Error types for vaultsync-core

use thiserror::Error;

/// Result type alias using vaultsync-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration error types
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Secret group requested but not configured
    #[error("Unknown secret group: {group}. Configured groups: {available}")]
    UnknownGroup { group: String, available: String },

    /// Vault requested but not configured
    #[error("Unknown vault: {vault}. Configured vaults: {available}")]
    UnknownVault { vault: String, available: String },

    /// No vault marked as default and none requested explicitly
    #[error("No default vault configured. Mark one vault with 'default: true' or pass --vault")]
    NoDefaultVault,

    /// Mapping cannot be expanded as written
    #[error("Invalid mapping in group '{group}' ({local} -> {vault}): {reason}")]
    InvalidMapping {
        group: String,
        local: String,
        vault: String,
        reason: String,
    },

    /// File mode is not a valid octal permission value
    #[error("Invalid file mode: {value}. Expected octal digits such as 0640")]
    InvalidMode { value: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unknown group error listing the configured group names
    pub fn unknown_group<I, S>(group: impl Into<String>, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::UnknownGroup {
            group: group.into(),
            available: join_names(available),
        }
    }

    /// Create an unknown vault error listing the configured vault ids
    pub fn unknown_vault<I, S>(vault: impl Into<String>, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::UnknownVault {
            vault: vault.into(),
            available: join_names(available),
        }
    }

    /// Create an invalid mapping error
    pub fn invalid_mapping(
        group: impl Into<String>,
        local: impl Into<String>,
        vault: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidMapping {
            group: group.into(),
            local: local.into(),
            vault: vault.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid mode error
    pub fn invalid_mode(value: impl Into<String>) -> Self {
        Self::InvalidMode {
            value: value.into(),
        }
    }
}

fn join_names<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> String {
    let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
