//! `SecretStoreClient` backed by the vault command-line client

use super::{SecretStoreClient, StoreTarget};
use crate::error::{Error, Result};
use tracing::{debug, trace};

/// Environment variable the vault client reads its server address from
const VAULT_ADDR_ENV: &str = "VAULT_ADDR";

/// Message printed by `vault list` for a path without keys
const NO_VALUE_FOUND: &str = "No value found at";

/// Runs the configured vault binary as a blocking subprocess per call
#[derive(Debug, Clone, Default)]
pub struct VaultCli;

impl VaultCli {
    pub fn new() -> Self {
        Self
    }

    /// Run the client and capture stdout
    ///
    /// `command` names the call in errors and logs; it never contains
    /// credentials or values.
    fn run(
        &self,
        target: &StoreTarget,
        command: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<CliOutput> {
        debug!("Running: {} (VAULT_ADDR={})", command, target.address);

        let mut expression = duct::cmd(target.binary.as_str(), args)
            .env(VAULT_ADDR_ENV, target.address.as_str())
            .dir(target.working_dir.as_std_path())
            .stdout_capture()
            .stderr_capture()
            .unchecked();

        if let Some(input) = stdin {
            expression = expression.stdin_bytes(input.to_vec());
        }

        let output = expression
            .run()
            .map_err(|e| Error::store(command, format!("failed to execute: {}", e)))?;

        Ok(CliOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

struct CliOutput {
    success: bool,
    code: Option<i32>,
    stdout: Vec<u8>,
    stderr: String,
}

impl CliOutput {
    /// Turn a non-zero exit into an error carrying stderr
    fn check(self, command: &str) -> Result<Vec<u8>> {
        if self.success {
            return Ok(self.stdout);
        }
        let status = self
            .code
            .map(|c| format!("exit code {}", c))
            .unwrap_or_else(|| "terminated by signal".to_string());
        let message = if self.stderr.is_empty() {
            status
        } else {
            format!("{}: {}", status, self.stderr)
        };
        Err(Error::store(command, message))
    }
}

impl SecretStoreClient for VaultCli {
    fn list_children(&self, target: &StoreTarget, path: &str) -> Result<Vec<String>> {
        let command = format!("{} list {}", target.binary, path);
        let args = vec![
            "list".to_string(),
            "--format=yaml".to_string(),
            path.to_string(),
        ];
        let output = self.run(target, &command, &args, None)?;

        if !output.success && output.stderr.contains(NO_VALUE_FOUND) {
            debug!("No keys under {}", path);
            return Ok(Vec::new());
        }

        let stdout = output.check(&command)?;
        let entries: Option<Vec<String>> = serde_yaml_ng::from_slice(&stdout)
            .map_err(|e| Error::store(&command, format!("unexpected list output: {}", e)))?;
        let entries = entries.unwrap_or_default();

        trace!("{} entries under {}", entries.len(), path);
        Ok(entries)
    }

    fn read_value(&self, target: &StoreTarget, path: &str) -> Result<Vec<u8>> {
        let command = format!("{} read -field=value {}", target.binary, path);
        let args = vec![
            "read".to_string(),
            "-field=value".to_string(),
            path.to_string(),
        ];
        self.run(target, &command, &args, None)?.check(&command)
    }

    fn write_value(
        &self,
        target: &StoreTarget,
        path: &str,
        value: &[u8],
        lease_ttl: Option<&str>,
    ) -> Result<()> {
        let mut args = vec!["write".to_string(), path.to_string()];
        if let Some(ttl) = lease_ttl {
            args.push(format!("ttl={}", ttl));
        }
        args.push("value=-".to_string());

        let command = format!("{} {}", target.binary, args.join(" "));
        let stdout = self.run(target, &command, &args, Some(value))?.check(&command)?;

        let stdout = String::from_utf8_lossy(&stdout);
        if !stdout.trim().is_empty() {
            debug!("{}", stdout.trim());
        }
        Ok(())
    }

    fn authenticate(&self, target: &StoreTarget, method: &str, args: &[String]) -> Result<()> {
        let command = format!("{} auth -method={}", target.binary, method);
        let mut full_args = vec!["auth".to_string(), format!("-method={}", method)];
        full_args.extend(args.iter().cloned());

        self.run(target, &command, &full_args, None)?
            .check(&command)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "vault-cli"
    }
}
