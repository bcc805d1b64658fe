//! Wildcard mapping expansion
//!
//! A mapping whose paths end in `*` stands for every key below the vault
//! prefix (read) or every regular file below the local prefix (write).
//! Expansion produces one [`ConcreteMapping`] per leaf. Any listing or walk
//! failure aborts the whole expansion; partial results are never returned.

use crate::client::{SecretStoreClient, StoreTarget};
use crate::error::{Error, Result};
use crate::types::{ConcreteMapping, Direction};
use camino::{Utf8Component, Utf8Path};
use tracing::debug;
use vaultsync_core::types::MappingConfig;
use walkdir::WalkDir;

/// Expand a mapping for the given direction
pub fn expand(
    client: &dyn SecretStoreClient,
    target: &StoreTarget,
    template: &MappingConfig,
    direction: Direction,
) -> Result<Vec<ConcreteMapping>> {
    match direction {
        Direction::Read => expand_for_read(client, target, template),
        Direction::Write => expand_for_write(&target.working_dir, template),
    }
}

/// Expand a mapping by listing vault keys under its vault prefix
///
/// Literal mappings are returned unchanged. Leaves are emitted in the order
/// the vault lists them.
pub fn expand_for_read(
    client: &dyn SecretStoreClient,
    target: &StoreTarget,
    template: &MappingConfig,
) -> Result<Vec<ConcreteMapping>> {
    if !template.is_vault_wildcard() {
        return Ok(vec![ConcreteMapping::from_template(template)]);
    }

    let mappings = walk_vault(
        client,
        target,
        template,
        template.vault_prefix(),
        template.local_prefix(),
    )?;
    debug!(
        "Expanded {} into {} mapping(s)",
        template.vault,
        mappings.len()
    );
    Ok(mappings)
}

fn walk_vault(
    client: &dyn SecretStoreClient,
    target: &StoreTarget,
    template: &MappingConfig,
    remote_dir: &str,
    local_dir: &str,
) -> Result<Vec<ConcreteMapping>> {
    let entries = client
        .list_children(target, remote_dir)
        .map_err(|e| Error::enumeration(remote_dir, e))?;

    let mut mappings = Vec::new();
    for entry in entries {
        if entry.is_empty() || entry == "/" {
            debug!("Skipping empty entry under {}", remote_dir);
            continue;
        }

        let remote = format!("{}{}", remote_dir, entry);
        let local = format!("{}{}", local_dir, entry);

        if entry.ends_with('/') {
            mappings.extend(walk_vault(client, target, template, &remote, &local)?);
        } else {
            mappings.push(ConcreteMapping::derived(template, local, remote));
        }
    }

    Ok(mappings)
}

/// Expand a mapping by walking regular files under its local prefix
///
/// The directory part of the local prefix is resolved against `root` and
/// walked; any remaining name part must start each file's path below that
/// directory, so `conf/app-*` picks up `conf/app-key` and `conf/app-certs/ca`.
/// Directories, symlinks and other non-regular entries are skipped. Files
/// are visited in file-name order.
pub fn expand_for_write(root: &Utf8Path, template: &MappingConfig) -> Result<Vec<ConcreteMapping>> {
    if !template.is_local_wildcard() {
        return Ok(vec![ConcreteMapping::from_template(template)]);
    }

    let local_prefix = template.local_prefix();
    let vault_prefix = template.vault_prefix();
    let (dir_part, name_part) = match local_prefix.rfind('/') {
        Some(idx) => local_prefix.split_at(idx + 1),
        None => ("", local_prefix),
    };
    let walk_root = root.join(dir_part);

    let walker = WalkDir::new(&walk_root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() != 1
                || name_part.is_empty()
                || e.file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(name_part))
        });

    let mut mappings = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| Error::enumeration(walk_root.as_str(), e))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(&walk_root)
            .map_err(|e| Error::enumeration(walk_root.as_str(), e))?;
        let relative = Utf8Path::from_path(relative).ok_or_else(|| {
            Error::enumeration(
                walk_root.as_str(),
                format!("path is not valid UTF-8: {}", relative.display()),
            )
        })?;
        let relative = to_slash_path(relative);

        let suffix = match relative.strip_prefix(name_part) {
            Some(suffix) if !suffix.is_empty() => suffix,
            _ => {
                debug!("Skipping {}{}: names the prefix itself", dir_part, relative);
                continue;
            }
        };

        mappings.push(ConcreteMapping::derived(
            template,
            format!("{}{}", local_prefix, suffix),
            format!("{}{}", vault_prefix, suffix),
        ));
    }

    debug!(
        "Expanded {} into {} mapping(s)",
        template.local,
        mappings.len()
    );
    Ok(mappings)
}

/// Join path components with `/`, the vault path separator
fn to_slash_path(path: &Utf8Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Utf8Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Vault listing backed by a fixed directory table
    struct Listing(HashMap<String, Vec<String>>);

    impl Listing {
        fn new() -> Self {
            Self(HashMap::new())
        }

        fn dir(mut self, path: &str, children: &[&str]) -> Self {
            self.0.insert(
                path.to_string(),
                children.iter().map(|c| c.to_string()).collect(),
            );
            self
        }
    }

    impl SecretStoreClient for Listing {
        fn list_children(&self, _target: &StoreTarget, path: &str) -> Result<Vec<String>> {
            self.0
                .get(path)
                .cloned()
                .ok_or_else(|| Error::store("list", format!("permission denied: {}", path)))
        }

        fn read_value(&self, _target: &StoreTarget, _path: &str) -> Result<Vec<u8>> {
            unreachable!("expansion never reads values")
        }

        fn write_value(
            &self,
            _target: &StoreTarget,
            _path: &str,
            _value: &[u8],
            _lease_ttl: Option<&str>,
        ) -> Result<()> {
            unreachable!("expansion never writes values")
        }

        fn authenticate(&self, _target: &StoreTarget, _method: &str, _args: &[String]) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &'static str {
            "listing"
        }
    }

    fn target(root: &Utf8Path) -> StoreTarget {
        StoreTarget {
            id: "test".to_string(),
            address: "http://127.0.0.1:8200".to_string(),
            binary: "vault".to_string(),
            working_dir: root.to_owned(),
        }
    }

    fn pairs(mappings: &[ConcreteMapping]) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = mappings
            .iter()
            .map(|m| (m.local.clone(), m.remote.clone()))
            .collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn test_read_expansion_visits_every_leaf_once() {
        let client = Listing::new().dir("p/", &["b/", "a"]).dir("p/b/", &["d", "c"]);
        let template = MappingConfig::new("L/*", "p/*").with_base64(true);

        let mappings =
            expand_for_read(&client, &target(Utf8Path::new("/cfg")), &template).unwrap();

        assert_eq!(
            pairs(&mappings),
            vec![
                ("L/a".to_string(), "p/a".to_string()),
                ("L/b/c".to_string(), "p/b/c".to_string()),
                ("L/b/d".to_string(), "p/b/d".to_string()),
            ]
        );
        assert!(mappings.iter().all(|m| m.base64));
    }

    #[test]
    fn test_read_expansion_of_empty_collection() {
        let client = Listing::new().dir("p/", &[]);
        let template = MappingConfig::new("L/*", "p/*");
        let mappings =
            expand_for_read(&client, &target(Utf8Path::new("/cfg")), &template).unwrap();
        assert!(mappings.is_empty());
    }

    #[test]
    fn test_read_expansion_fails_on_nested_listing_error() {
        let client = Listing::new().dir("p/", &["a", "locked/"]);
        let template = MappingConfig::new("L/*", "p/*");
        let err =
            expand_for_read(&client, &target(Utf8Path::new("/cfg")), &template).unwrap_err();
        assert!(matches!(err, Error::Enumeration { ref path, .. } if path == "p/locked/"));
    }

    #[test]
    fn test_literal_mapping_expands_to_itself() {
        let client = Listing::new();
        let template = MappingConfig::new("conf/token", "secret/token")
            .with_mode(vaultsync_core::types::FileMode::new(0o600));
        let expected = vec![ConcreteMapping::from_template(&template)];

        let root = Utf8Path::new("/does/not/exist");
        assert_eq!(
            expand(&client, &target(root), &template, Direction::Read).unwrap(),
            expected
        );
        assert_eq!(
            expand(&client, &target(root), &template, Direction::Write).unwrap(),
            expected
        );
    }

    #[test]
    fn test_write_expansion_walks_regular_files_only() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("x/empty")).unwrap();
        fs::write(root.join("x/1.txt"), "one").unwrap();
        fs::write(root.join("x/2.bin"), [0u8, 1, 2]).unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(root.join("x/1.txt"), root.join("x/link")).unwrap();

        let template = MappingConfig::new("x/*", "secret/*");
        let mappings = expand_for_write(&root, &template).unwrap();

        assert_eq!(
            pairs(&mappings),
            vec![
                ("x/1.txt".to_string(), "secret/1.txt".to_string()),
                ("x/2.bin".to_string(), "secret/2.bin".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_expansion_recurses_with_slash_paths() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("certs/nested/deeper")).unwrap();
        fs::write(root.join("certs/nested/deeper/key.pem"), "k").unwrap();

        let template = MappingConfig::new("certs/*", "secret/app/certs/*");
        let mappings = expand_for_write(&root, &template).unwrap();

        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].local, "certs/nested/deeper/key.pem");
        assert_eq!(mappings[0].remote, "secret/app/certs/nested/deeper/key.pem");
    }

    #[test]
    fn test_read_expansion_with_bare_local_prefix() {
        let client = Listing::new().dir("p/", &["a", "b/"]).dir("p/b/", &["c"]);
        let template = MappingConfig::new("L*", "p/*");

        let mappings =
            expand_for_read(&client, &target(Utf8Path::new("/cfg")), &template).unwrap();

        assert_eq!(
            pairs(&mappings),
            vec![
                ("La".to_string(), "p/a".to_string()),
                ("Lb/c".to_string(), "p/b/c".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_expansion_with_name_prefix() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("conf/app-certs")).unwrap();
        fs::write(root.join("conf/app-key"), "k").unwrap();
        fs::write(root.join("conf/app-certs/ca.pem"), "ca").unwrap();
        fs::write(root.join("conf/other"), "o").unwrap();

        let template = MappingConfig::new("conf/app-*", "secret/app/*");
        let mappings = expand_for_write(&root, &template).unwrap();

        assert_eq!(
            pairs(&mappings),
            vec![
                ("conf/app-certs/ca.pem".to_string(), "secret/app/certs/ca.pem".to_string()),
                ("conf/app-key".to_string(), "secret/app/key".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_expansion_with_bare_prefix_walks_root() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("Lb")).unwrap();
        fs::write(root.join("La"), "a").unwrap();
        fs::write(root.join("Lb/c"), "c").unwrap();
        fs::write(root.join("vaultsync.yaml"), "").unwrap();

        let mappings = expand_for_write(&root, &MappingConfig::new("L*", "p/*")).unwrap();

        assert_eq!(
            pairs(&mappings),
            vec![
                ("La".to_string(), "p/a".to_string()),
                ("Lb/c".to_string(), "p/b/c".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_expansion_of_empty_directory() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("x")).unwrap();

        let mappings = expand_for_write(&root, &MappingConfig::new("x/*", "s/*")).unwrap();
        assert!(mappings.is_empty());
    }

    #[test]
    fn test_write_expansion_of_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();

        let err = expand_for_write(&root, &MappingConfig::new("missing/*", "s/*")).unwrap_err();
        assert!(matches!(err, Error::Enumeration { .. }));
    }
}
