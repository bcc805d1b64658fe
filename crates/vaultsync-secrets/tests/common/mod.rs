//! Common test utilities for vaultsync-secrets
//!
//! - `MemoryStore`: in-memory `SecretStoreClient` that records every call and
//!   can be told to fail specific operations
//! - `create_mock_vault`: shell script standing in for the vault binary
//! - config helpers writing a vaultsync.yaml into a temp directory

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use tempfile::TempDir;
use vaultsync_core::SyncConfig;
use vaultsync_secrets::{Error, Result, SecretStoreClient, StoreTarget};

/// Record of a store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List(String),
    Read(String),
    Write {
        path: String,
        lease_ttl: Option<String>,
    },
    Auth {
        method: String,
        args: Vec<String>,
    },
}

/// In-memory vault
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, Vec<u8>>>,
    calls: Mutex<Vec<StoreCall>>,
    failing_paths: Mutex<HashSet<String>>,
    fail_auth: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value
    pub fn insert(&self, path: &str, value: impl Into<Vec<u8>>) {
        self.values
            .lock()
            .unwrap()
            .insert(path.to_string(), value.into());
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.values.lock().unwrap().get(path).cloned()
    }

    /// Make every read or write of `path` fail
    pub fn fail_on(&self, path: &str) {
        self.failing_paths.lock().unwrap().insert(path.to_string());
    }

    pub fn fail_auth(&self) {
        *self.fail_auth.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Paths passed to write, in call order
    pub fn written_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Write { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    /// Paths passed to read, in call order
    pub fn read_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Read(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self, command: &str, path: &str) -> Result<()> {
        if self.failing_paths.lock().unwrap().contains(path) {
            return Err(Error::store(
                format!("{} {}", command, path),
                "injected failure",
            ));
        }
        Ok(())
    }
}

impl SecretStoreClient for MemoryStore {
    fn list_children(&self, _target: &StoreTarget, path: &str) -> Result<Vec<String>> {
        self.record(StoreCall::List(path.to_string()));

        let values = self.values.lock().unwrap();
        let mut children: Vec<String> = Vec::new();
        // Reverse order so callers cannot rely on sorted listings
        for key in values.keys().rev() {
            let Some(rest) = key.strip_prefix(path) else {
                continue;
            };
            let child = match rest.find('/') {
                Some(idx) => rest[..=idx].to_string(),
                None => rest.to_string(),
            };
            if !children.contains(&child) {
                children.push(child);
            }
        }
        Ok(children)
    }

    fn read_value(&self, _target: &StoreTarget, path: &str) -> Result<Vec<u8>> {
        self.record(StoreCall::Read(path.to_string()));
        self.check_failure("read", path)?;
        self.get(path)
            .ok_or_else(|| Error::store(format!("read {}", path), "No value found"))
    }

    fn write_value(
        &self,
        _target: &StoreTarget,
        path: &str,
        value: &[u8],
        lease_ttl: Option<&str>,
    ) -> Result<()> {
        self.record(StoreCall::Write {
            path: path.to_string(),
            lease_ttl: lease_ttl.map(str::to_string),
        });
        self.check_failure("write", path)?;
        self.insert(path, value);
        Ok(())
    }

    fn authenticate(&self, _target: &StoreTarget, method: &str, args: &[String]) -> Result<()> {
        self.record(StoreCall::Auth {
            method: method.to_string(),
            args: args.to_vec(),
        });
        if *self.fail_auth.lock().unwrap() {
            return Err(Error::store("auth", "permission denied"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Temp directory used as the configuration root
pub struct TestRoot {
    pub dir: TempDir,
    pub root: Utf8PathBuf,
}

impl TestRoot {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        Self { dir, root }
    }

    /// Write a file relative to the root, creating parents
    pub fn write_file(&self, relative: &str, content: impl AsRef<[u8]>) {
        let path = self.root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    pub fn read_file(&self, relative: &str) -> Vec<u8> {
        std::fs::read(self.root.join(relative)).unwrap()
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }

    /// Write vaultsync.yaml and load it
    pub fn config(&self, yaml: &str) -> SyncConfig {
        let path = self.root.join("vaultsync.yaml");
        std::fs::write(&path, yaml).unwrap();
        SyncConfig::load(Some(&path)).unwrap()
    }

    #[cfg(unix)]
    pub fn mode_of(&self, relative: &str) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(self.root.join(relative))
            .unwrap()
            .permissions()
            .mode()
            & 0o7777
    }
}

/// Single default vault without auth
pub const LOCAL_VAULT: &str = r#"
vaults:
  local:
    address: http://127.0.0.1:8200
    default: true
"#;

/// Mock vault client script
///
/// - logs `$*` per invocation to `<dir>/vault.log` and VAULT_ADDR/cwd to `<dir>/env.log`
/// - `list secret/app/` and `list secret/app/sub/` return fixed YAML listings,
///   other lists fail with "No value found"
/// - `read` prints `value-of-<path>` without a trailing newline
/// - `write` appends stdin to `<dir>/stdin.log`
/// - `auth -method=bad` fails
const MOCK_VAULT_SCRIPT: &str = r#"#!/bin/sh
echo "$*" >> "__DIR__/vault.log"
echo "VAULT_ADDR=$VAULT_ADDR PWD=$(pwd)" >> "__DIR__/env.log"
case "$1" in
  list)
    case "$3" in
      secret/app/)
        printf '%s\n' '- a' '- sub/'
        ;;
      secret/app/sub/)
        printf '%s\n' '- b'
        ;;
      *)
        echo "No value found at $3" >&2
        exit 2
        ;;
    esac
    ;;
  read)
    printf 'value-of-%s' "$3"
    ;;
  write)
    cat >> "__DIR__/stdin.log"
    echo "Success! Data written to: $2"
    ;;
  auth)
    if [ "$2" = "-method=bad" ]; then
      echo "Error authenticating: invalid credentials" >&2
      exit 1
    fi
    ;;
  *)
    echo "unknown command $1" >&2
    exit 1
    ;;
esac
"#;

/// Install the mock vault script into `dir` and return its path
#[cfg(unix)]
pub fn create_mock_vault(dir: &Utf8Path) -> Utf8PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script_path = dir.join("mock-vault");
    std::fs::write(&script_path, MOCK_VAULT_SCRIPT.replace("__DIR__", dir.as_str())).unwrap();
    std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();
    script_path
}

/// Read a mock log file as lines
pub fn read_log(dir: &Utf8Path, name: &str) -> Vec<String> {
    let path = dir.join(name);
    if path.exists() {
        std::fs::read_to_string(&path)
            .unwrap_or_default()
            .lines()
            .map(|s| s.to_string())
            .collect()
    } else {
        vec![]
    }
}
