//! Single-mapping transfers between the vault and the filesystem

use crate::client::{SecretStoreClient, StoreTarget};
use crate::error::{Error, Result};
use crate::types::{ConcreteMapping, Direction};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use camino::Utf8Path;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::{debug, info};
use vaultsync_core::types::FileMode;

/// Copy one vault value into a local file
///
/// Missing parent directories are created. The file is created or truncated
/// and then set to `mode`. Values of base64 mappings are decoded first.
pub fn read_one(
    client: &dyn SecretStoreClient,
    target: &StoreTarget,
    mapping: &ConcreteMapping,
    mode: FileMode,
) -> Result<()> {
    let path = target.working_dir.join(&mapping.local);
    let fail = |message: String| {
        Error::transfer(Direction::Read, &mapping.local, &mapping.remote, message)
    };

    info!("read {} > {} ({})", mapping.remote, path, mode);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| fail(format!("cannot create directory {}: {}", parent, e)))?;
    }

    let value = client
        .read_value(target, &mapping.remote)
        .map_err(|e| fail(e.to_string()))?;

    let content = if mapping.base64 {
        decode_base64(&value).map_err(fail)?
    } else {
        value
    };

    write_file(&path, &content, mode).map_err(|e| fail(format!("cannot write {}: {}", path, e)))?;

    debug!("Wrote {} bytes to {}", content.len(), path);
    Ok(())
}

/// Copy one local file into the vault
///
/// File content of base64 mappings is encoded first. `lease_ttl` is passed
/// through to the vault when set.
pub fn write_one(
    client: &dyn SecretStoreClient,
    target: &StoreTarget,
    mapping: &ConcreteMapping,
    lease_ttl: Option<&str>,
) -> Result<()> {
    let path = target.working_dir.join(&mapping.local);
    let fail = |message: String| {
        Error::transfer(Direction::Write, &mapping.local, &mapping.remote, message)
    };

    match lease_ttl {
        Some(ttl) => info!("write {} < {} (ttl={})", mapping.remote, path, ttl),
        None => info!("write {} < {}", mapping.remote, path),
    }

    let content = fs::read(&path).map_err(|e| fail(format!("cannot read {}: {}", path, e)))?;

    let value = if mapping.base64 {
        BASE64.encode(&content).into_bytes()
    } else {
        content
    };

    client
        .write_value(target, &mapping.remote, &value, lease_ttl)
        .map_err(|e| fail(e.to_string()))?;

    debug!("Wrote {} bytes to {}", value.len(), mapping.remote);
    Ok(())
}

/// Decode a base64 value, ignoring surrounding whitespace
fn decode_base64(value: &[u8]) -> std::result::Result<Vec<u8>, String> {
    BASE64
        .decode(value.trim_ascii())
        .map_err(|e| format!("value is not valid base64: {}", e))
}

/// Create or truncate `path` and write `content` with exactly `mode`
///
/// The mode is passed at creation and re-applied before writing, so the
/// content is never readable under a wider mode, including when the file
/// already existed.
fn write_file(path: &Utf8Path, content: &[u8], mode: FileMode) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    std::os::unix::fs::OpenOptionsExt::mode(&mut options, mode.bits());

    let mut file = options.open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(mode.bits()))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    file.write_all(content)?;
    file.flush()
}
