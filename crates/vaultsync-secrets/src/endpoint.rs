//! Vault selection

use tracing::warn;
use vaultsync_core::types::VaultConfig;
use vaultsync_core::{Error as ConfigError, SyncConfig};

/// Outcome of choosing the vault for a run
#[derive(Debug, Clone, Copy)]
pub struct VaultSelection<'a> {
    pub id: &'a str,
    pub vault: &'a VaultConfig,
    /// Other vaults also marked default, in configuration order
    pub conflicts: usize,
}

impl VaultSelection<'_> {
    /// Whether more than one vault was marked default
    pub fn has_conflict(&self) -> bool {
        self.conflicts > 0
    }
}

/// Pick the requested vault, or the default one
///
/// An explicit id must exist. Without one, the first vault marked default in
/// configuration order wins; further defaults are counted as conflicts and
/// logged, not rejected.
pub fn select_vault<'a>(
    config: &'a SyncConfig,
    requested: Option<&str>,
) -> Result<VaultSelection<'a>, ConfigError> {
    if let Some(id) = requested {
        let (id, vault) = config.vault(id)?;
        return Ok(VaultSelection {
            id,
            vault,
            conflicts: 0,
        });
    }

    let mut defaults = config
        .inner()
        .vaults
        .iter()
        .filter(|(_, vault)| vault.default)
        .map(|(id, vault)| (id.as_str(), vault));
    let (id, vault) = defaults.next().ok_or(ConfigError::NoDefaultVault)?;

    let mut conflicts = 0;
    for (other, _) in defaults {
        warn!(
            "Multiple vaults set as default ('{}' and '{}'), but only one allowed. Using '{}'",
            id, other, id
        );
        conflicts += 1;
    }

    Ok(VaultSelection {
        id,
        vault,
        conflicts,
    })
}
