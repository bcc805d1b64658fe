//! Configuration file discovery, loading and validation

use crate::error::{Error, Result};
use crate::types::{SecretGroupConfig, SyncConfigFile, VaultConfig};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::{debug, info};

/// Configuration file names to search for, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "vaultsync.yaml",
    "vaultsync.yml",
    ".vaultsync.yaml",
    ".vaultsync.yml",
];

/// Starter configuration written by `vaultsync config init`
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# vaultsync configuration
#
# Local paths are relative to the directory containing this file.
vaults:
  {vault_id}:
    address: {address}
    bin: vault
    default: true
    # auth:
    #   method: userpass
    #   credentialFile: .vault-credentials

secrets:
  app:
    # leaseTtl: 24h
    mode: 0640
    mappings:
      - local: secrets/*
        vault: secret/app/*
      # - local: certs/server.p12
      #   vault: secret/app/server-p12
      #   mode: 0600
      #   base64: true
"#;

/// Loaded configuration plus the directory it was loaded from
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// The parsed configuration
    pub config: SyncConfigFile,

    /// Path to the configuration file
    pub config_path: Utf8PathBuf,

    /// Configuration root; local mapping paths resolve against it
    pub root: Utf8PathBuf,
}

impl SyncConfig {
    /// Load configuration from the specified path or search for it
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_owned(),
            None => Self::find_config(&current_dir()?)?,
        };

        let content = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(config_path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        let config_path = absolutize(&config_path)?;
        info!("Using config {}", config_path);

        Self::from_yaml(&content, config_path)
    }

    /// Parse configuration text as if it were read from `config_path`
    pub fn from_yaml(content: &str, config_path: Utf8PathBuf) -> Result<Self> {
        let config: SyncConfigFile = serde_yaml_ng::from_str(content)?;

        let root = match config_path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_owned(),
            _ => Utf8PathBuf::from("."),
        };

        debug!(
            "Loaded {} vault(s) and {} secret group(s) from {}",
            config.vaults.len(),
            config.secrets.len(),
            config_path
        );

        Ok(Self {
            config,
            config_path,
            root,
        })
    }

    /// Find a configuration file in `start` or any of its parent directories
    pub fn find_config(start: &Utf8Path) -> Result<Utf8PathBuf> {
        let mut current = start;

        loop {
            for name in CONFIG_FILE_NAMES {
                let path = current.join(name);
                if path.is_file() {
                    debug!("Found config at {}", path);
                    return Ok(path);
                }
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Err(Error::config_not_found(format!(
            "{} (searched {} and parent directories)",
            CONFIG_FILE_NAMES[0], start
        )))
    }

    /// Validate every vault and mapping
    pub fn validate(&self) -> Result<()> {
        for (id, vault) in self.config.vaults.iter() {
            if vault.address.trim().is_empty() {
                return Err(Error::invalid_config(format!(
                    "vault '{}' has no address",
                    id
                )));
            }
            if vault.auth_method().is_some() && vault.credential_file().is_none() {
                return Err(Error::invalid_config(format!(
                    "vault '{}' declares auth method but no credentialFile",
                    id
                )));
            }
        }

        for (name, group) in self.config.secrets.iter() {
            for mapping in &group.mappings {
                mapping.validate(name)?;
            }
        }

        Ok(())
    }

    /// Get the inner configuration file
    pub fn inner(&self) -> &SyncConfigFile {
        &self.config
    }

    /// Look up a vault by id, returning the configured id with it
    pub fn vault(&self, id: &str) -> Result<(&str, &VaultConfig)> {
        self.config
            .vaults
            .get_key_value(id)
            .map(|(key, vault)| (key.as_str(), vault))
            .ok_or_else(|| Error::unknown_vault(id, self.config.vaults.keys()))
    }

    /// Look up a secret group by name, returning the configured name with it
    pub fn group(&self, name: &str) -> Result<(&str, &SecretGroupConfig)> {
        self.config
            .secrets
            .get_key_value(name)
            .map(|(key, group)| (key.as_str(), group))
            .ok_or_else(|| Error::unknown_group(name, self.group_names()))
    }

    /// Secret group names in configuration order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.config.secrets.keys().map(String::as_str)
    }

    /// Serialize the configuration back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(&self.config)?)
    }
}

/// Render the starter configuration for a single vault
pub fn generate_default_config(vault_id: &str, address: &str) -> String {
    DEFAULT_CONFIG_TEMPLATE
        .replace("{vault_id}", vault_id)
        .replace("{address}", address)
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd)
        .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))
}

fn absolutize(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if path.is_absolute() {
        Ok(path.to_owned())
    } else {
        Ok(current_dir()?.join(path))
    }
}
