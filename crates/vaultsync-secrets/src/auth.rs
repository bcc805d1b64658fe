//! Vault authentication

use crate::client::{SecretStoreClient, StoreTarget};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::info;
use vaultsync_core::types::VaultConfig;

/// Authenticate once against the selected vault
///
/// Without an auth method this does nothing. Otherwise every non-empty line
/// of the credential file (relative to the configuration root) becomes one
/// argument to the client's auth call.
pub fn authenticate(
    client: &dyn SecretStoreClient,
    target: &StoreTarget,
    vault: &VaultConfig,
) -> Result<()> {
    let Some(method) = vault.auth_method() else {
        info!("No auth method defined for vault '{}' - skipping auth", target.id);
        return Ok(());
    };

    let credential_file = vault.credential_file().ok_or_else(|| {
        Error::authentication(&target.id, "auth method set but no credential file configured")
    })?;

    let args = read_credentials(target, credential_file)?;

    info!(
        "Authenticating with vault '{}' using method '{}'",
        target.id, method
    );
    client
        .authenticate(target, method, &args)
        .map_err(|e| Error::authentication(&target.id, e))
}

/// Read credential arguments, one per line
fn read_credentials(target: &StoreTarget, credential_file: &str) -> Result<Vec<String>> {
    let path = target.working_dir.join(credential_file);
    let file = File::open(&path).map_err(|e| {
        Error::authentication(
            &target.id,
            format!("cannot open credential file {}: {}", path, e),
        )
    })?;

    let mut args = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| {
            Error::authentication(
                &target.id,
                format!("cannot read credential file {}: {}", path, e),
            )
        })?;
        if !line.trim().is_empty() {
            args.push(line);
        }
    }

    Ok(args)
}
