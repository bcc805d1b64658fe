//! Vault access capability and its command-line implementation

mod vault_cli;

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use vaultsync_core::types::VaultConfig;

pub use vault_cli::VaultCli;

/// Connection parameters for one vault call
///
/// Built per invocation from the selected vault and the configuration root;
/// clients keep no state between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTarget {
    /// Vault id from the configuration
    pub id: String,
    /// Server address
    pub address: String,
    /// Client binary
    pub binary: String,
    /// Working directory for client invocations
    pub working_dir: Utf8PathBuf,
}

impl StoreTarget {
    pub fn new(id: impl Into<String>, vault: &VaultConfig, root: &Utf8Path) -> Self {
        Self {
            id: id.into(),
            address: vault.address.clone(),
            binary: vault.bin.clone(),
            working_dir: root.to_owned(),
        }
    }
}

/// Operations the engine needs from a vault
///
/// All calls block until the operation has completed.
pub trait SecretStoreClient: Send + Sync {
    /// List the direct children of `path`
    ///
    /// Entries ending in `/` denote nested collections. An empty collection
    /// yields an empty list.
    fn list_children(&self, target: &StoreTarget, path: &str) -> Result<Vec<String>>;

    /// Read the value stored at `path`
    fn read_value(&self, target: &StoreTarget, path: &str) -> Result<Vec<u8>>;

    /// Store `value` at `path`, optionally with a lease duration
    fn write_value(
        &self,
        target: &StoreTarget,
        path: &str,
        value: &[u8],
        lease_ttl: Option<&str>,
    ) -> Result<()>;

    /// Authenticate with `method`, passing `args` through to the client
    fn authenticate(&self, target: &StoreTarget, method: &str, args: &[String]) -> Result<()>;

    /// Client name for log messages
    fn name(&self) -> &'static str;
}
