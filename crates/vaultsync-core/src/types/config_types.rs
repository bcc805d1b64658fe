//! Configuration file types (vaultsync.yaml)

use crate::error::{Error, Result};
use crate::types::FileMode;
use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Marker that turns a mapping into a recursive prefix mapping
pub const WILDCARD: char = '*';

/// Default client binary when a vault does not name one
pub const DEFAULT_VAULT_BIN: &str = "vault";

/// Root of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncConfigFile {
    /// Configured vault endpoints, keyed by id. Order is preserved (IndexMap).
    #[serde(default, deserialize_with = "unique_keys")]
    pub vaults: IndexMap<String, VaultConfig>,

    /// Secret groups, keyed by name, in declaration order
    #[serde(default, alias = "secretGroups", deserialize_with = "unique_keys")]
    pub secrets: IndexMap<String, SecretGroupConfig>,
}

/// Deserialize a mapping in declaration order, rejecting repeated keys
fn unique_keys<'de, D, V>(deserializer: D) -> std::result::Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueKeys<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeys<V> {
        type Value = IndexMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a mapping with unique keys")
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(IndexMap::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
            let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                if map.contains_key(&key) {
                    return Err(de::Error::custom(format!("duplicate key '{}'", key)));
                }
                map.insert(key, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueKeys(PhantomData))
}

/// A vault endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault server address, exported as VAULT_ADDR for the client
    pub address: String,

    /// Client binary (name on PATH or path)
    #[serde(default = "default_vault_bin")]
    pub bin: String,

    /// Authentication settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<VaultAuthConfig>,

    /// Whether this vault is used when none is requested
    #[serde(default)]
    pub default: bool,
}

fn default_vault_bin() -> String {
    DEFAULT_VAULT_BIN.to_string()
}

impl VaultConfig {
    /// Authentication method, if one is configured
    pub fn auth_method(&self) -> Option<&str> {
        self.auth
            .as_ref()
            .map(|a| a.method.as_str())
            .filter(|m| !m.is_empty())
    }

    /// Credential file, relative to the configuration root
    pub fn credential_file(&self) -> Option<&str> {
        self.auth
            .as_ref()
            .and_then(|a| a.credential_file.as_deref())
            .filter(|p| !p.is_empty())
    }
}

/// Vault authentication settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultAuthConfig {
    /// Auth method passed as `-method=<method>`
    #[serde(default)]
    pub method: String,

    /// File holding one auth argument per line
    #[serde(
        default,
        rename = "credentialFile",
        alias = "credential_file",
        alias = "credentialFilePath",
        skip_serializing_if = "Option::is_none"
    )]
    pub credential_file: Option<String>,
}

/// A named group of mappings sharing lease and mode defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretGroupConfig {
    /// Lease duration attached to written values (e.g. "24h")
    #[serde(
        default,
        rename = "leaseTtl",
        alias = "lease_ttl",
        skip_serializing_if = "Option::is_none"
    )]
    pub lease_ttl: Option<String>,

    /// Default file mode for files read in this group
    #[serde(default, alias = "mod", skip_serializing_if = "Option::is_none")]
    pub mode: Option<FileMode>,

    /// Mappings, processed in declaration order
    #[serde(default)]
    pub mappings: Vec<MappingConfig>,
}

impl SecretGroupConfig {
    /// Lease duration, if a non-empty one is configured
    pub fn lease_ttl(&self) -> Option<&str> {
        self.lease_ttl.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn mode(&self) -> FileMode {
        self.mode.unwrap_or_default()
    }
}

/// A local path <-> vault path pairing, possibly wildcarded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Local path, relative to the configuration root
    pub local: String,

    /// Vault path
    pub vault: String,

    /// File mode for files read through this mapping
    #[serde(default, alias = "mod", skip_serializing_if = "Option::is_none")]
    pub mode: Option<FileMode>,

    /// Base64-encode values on write and decode them on read
    #[serde(default)]
    pub base64: bool,
}

impl MappingConfig {
    pub fn new(local: impl Into<String>, vault: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            vault: vault.into(),
            mode: None,
            base64: false,
        }
    }

    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_base64(mut self, base64: bool) -> Self {
        self.base64 = base64;
        self
    }

    pub fn mode(&self) -> FileMode {
        self.mode.unwrap_or_default()
    }

    /// Local pattern ends with the wildcard marker
    pub fn is_local_wildcard(&self) -> bool {
        self.local.ends_with(WILDCARD)
    }

    /// Vault pattern ends with the wildcard marker
    pub fn is_vault_wildcard(&self) -> bool {
        self.vault.ends_with(WILDCARD)
    }

    /// Local pattern with the trailing wildcard marker removed
    pub fn local_prefix(&self) -> &str {
        self.local.strip_suffix(WILDCARD).unwrap_or(&self.local)
    }

    /// Vault pattern with the trailing wildcard marker removed
    pub fn vault_prefix(&self) -> &str {
        self.vault.strip_suffix(WILDCARD).unwrap_or(&self.vault)
    }

    /// Check that the mapping can be expanded unambiguously
    ///
    /// Both sides must be literal, or both must end in the wildcard marker.
    /// The marker is only recognised as the last character. The vault prefix
    /// of a wildcard must name a collection; the local prefix is prepended
    /// as-is, so `conf/app-*` is allowed.
    pub fn validate(&self, group: &str) -> Result<()> {
        let invalid = |reason: &str| Error::invalid_mapping(group, &self.local, &self.vault, reason);

        if self.local.trim().is_empty() {
            return Err(invalid("local path is empty"));
        }
        if self.vault.trim().is_empty() {
            return Err(invalid("vault path is empty"));
        }
        if self.local_prefix().contains(WILDCARD) || self.vault_prefix().contains(WILDCARD) {
            return Err(invalid("wildcard '*' is only allowed as the last character"));
        }
        match (self.is_local_wildcard(), self.is_vault_wildcard()) {
            (true, false) => Err(invalid("local path is wildcarded but vault path is not")),
            (false, true) => Err(invalid("vault path is wildcarded but local path is not")),
            (true, true) => {
                if !is_directory_prefix(self.vault_prefix()) {
                    return Err(invalid("vault wildcard '*' must directly follow a '/'"));
                }
                Ok(())
            }
            (false, false) => Ok(()),
        }
    }
}

/// A wildcard prefix names a whole collection: empty or ending in `/`
fn is_directory_prefix(prefix: &str) -> bool {
    prefix.is_empty() || prefix.ends_with('/')
}
