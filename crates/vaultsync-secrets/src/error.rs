//! Error types for vaultsync-secrets

use thiserror::Error;

/// Result type alias using vaultsync-secrets's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Synchronization error types
///
/// Every variant except `UnsupportedOperation` aborts the whole run.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed, missing or inconsistent configuration
    #[error(transparent)]
    Config(#[from] vaultsync_core::Error),

    /// Authentication against the vault failed
    #[error("Authentication with vault '{vault}' failed: {message}")]
    Authentication { vault: String, message: String },

    /// Listing vault keys or walking local files failed during expansion
    #[error("Failed to expand {path}: {message}")]
    Enumeration { path: String, message: String },

    /// A single read or write failed
    #[error("Failed to {direction} {local} <-> {remote}: {message}")]
    Transfer {
        direction: String,
        local: String,
        remote: String,
        message: String,
    },

    /// Unrecognised operation requested by the caller
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    /// A vault client invocation failed
    #[error("`{command}` failed: {message}")]
    Store { command: String, message: String },
}

impl Error {
    /// Create an authentication error
    pub fn authentication(vault: impl Into<String>, message: impl ToString) -> Self {
        Self::Authentication {
            vault: vault.into(),
            message: message.to_string(),
        }
    }

    /// Create an enumeration error
    pub fn enumeration(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Enumeration {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a transfer error
    pub fn transfer(
        direction: impl ToString,
        local: impl Into<String>,
        remote: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        Self::Transfer {
            direction: direction.to_string(),
            local: local.into(),
            remote: remote.into(),
            message: message.to_string(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported_operation(operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
        }
    }

    /// Create a store client error
    pub fn store(command: impl Into<String>, message: impl ToString) -> Self {
        Self::Store {
            command: command.into(),
            message: message.to_string(),
        }
    }

    /// Whether the run must stop on this error
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnsupportedOperation { .. })
    }
}
