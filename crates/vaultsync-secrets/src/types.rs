//! Core types for secret synchronization

use crate::error::Error;
use std::fmt;
use std::str::FromStr;
use vaultsync_core::types::{FileMode, MappingConfig};

/// Transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Vault -> filesystem
    Read,
    /// Filesystem -> vault
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Read => write!(f, "read"),
            Direction::Write => write!(f, "write"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(Direction::Read),
            "write" => Ok(Direction::Write),
            _ => Err(Error::unsupported_operation(s)),
        }
    }
}

/// A fully resolved local path <-> vault path pair
///
/// `local` is relative to the configuration root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteMapping {
    pub local: String,
    pub remote: String,
    pub mode: FileMode,
    pub base64: bool,
}

impl ConcreteMapping {
    /// Take a literal mapping as-is
    pub fn from_template(template: &MappingConfig) -> Self {
        Self {
            local: template.local.clone(),
            remote: template.vault.clone(),
            mode: template.mode(),
            base64: template.base64,
        }
    }

    /// Derive a mapping for one expanded entry, carrying the template's policy
    pub(crate) fn derived(template: &MappingConfig, local: String, remote: String) -> Self {
        Self {
            local,
            remote,
            mode: template.mode(),
            base64: template.base64,
        }
    }
}

impl fmt::Display for ConcreteMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.local, self.remote)
    }
}

/// One invocation: a direction, the groups to process and an optional vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub direction: Direction,
    /// Groups to process; empty means every group in configuration order
    pub groups: Vec<String>,
    /// Vault id overriding the default vault
    pub vault: Option<String>,
}

impl SyncRequest {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            groups: Vec::new(),
            vault: None,
        }
    }

    pub fn read() -> Self {
        Self::new(Direction::Read)
    }

    pub fn write() -> Self {
        Self::new(Direction::Write)
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_vault(mut self, vault: Option<String>) -> Self {
        self.vault = vault;
        self
    }
}
