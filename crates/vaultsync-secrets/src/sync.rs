//! Group orchestration
//!
//! A run selects one vault, authenticates once, then processes the selected
//! groups strictly in order: each mapping is expanded and every resulting
//! concrete mapping is transferred before the next one is expanded. The
//! first error stops the run.

use crate::auth::authenticate;
use crate::client::{SecretStoreClient, StoreTarget};
use crate::endpoint::select_vault;
use crate::error::{Error, Result};
use crate::expand::expand;
use crate::policy::resolve_mode;
use crate::transfer::{read_one, write_one};
use crate::types::{ConcreteMapping, Direction, SyncRequest};
use tracing::{debug, info};
use vaultsync_core::types::SecretGroupConfig;
use vaultsync_core::SyncConfig;

/// Mappings transferred for one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub name: String,
    pub mappings: Vec<ConcreteMapping>,
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub direction: Direction,
    /// Id of the vault used
    pub vault: String,
    /// Number of extra vaults marked default that were ignored
    pub default_conflicts: usize,
    /// Processed groups, in processing order
    pub groups: Vec<GroupReport>,
}

impl SyncReport {
    /// Total number of transferred mappings
    pub fn transferred(&self) -> usize {
        self.groups.iter().map(|g| g.mappings.len()).sum()
    }
}

/// Drives expansion and transfers for a loaded configuration
pub struct Synchronizer<'a> {
    config: &'a SyncConfig,
    client: &'a dyn SecretStoreClient,
}

impl<'a> Synchronizer<'a> {
    pub fn new(config: &'a SyncConfig, client: &'a dyn SecretStoreClient) -> Self {
        Self { config, client }
    }

    /// Execute one request
    ///
    /// Configuration problems (invalid mappings, unknown groups, unknown or
    /// missing vault) are reported before authentication.
    pub fn run(&self, request: &SyncRequest) -> Result<SyncReport> {
        self.config.validate()?;
        let groups = self.select_groups(&request.groups)?;

        let selection = select_vault(self.config, request.vault.as_deref())?;
        let target = StoreTarget::new(selection.id, selection.vault, &self.config.root);
        info!(
            "Using vault '{}' at {} via {}",
            selection.id,
            selection.vault.address,
            self.client.name()
        );

        authenticate(self.client, &target, selection.vault)?;

        let mut report = SyncReport {
            direction: request.direction,
            vault: selection.id.to_string(),
            default_conflicts: selection.conflicts,
            groups: Vec::with_capacity(groups.len()),
        };

        for (name, group) in groups {
            let group_report = self.process_group(&target, name, group, request.direction)?;
            report.groups.push(group_report);
        }

        info!(
            "{} complete: {} mapping(s) in {} group(s)",
            request.direction,
            report.transferred(),
            report.groups.len()
        );
        Ok(report)
    }

    /// Requested groups in request order, or every group in configuration order
    fn select_groups(&self, requested: &[String]) -> Result<Vec<(&'a str, &'a SecretGroupConfig)>> {
        let config: &'a SyncConfig = self.config;

        if requested.is_empty() {
            return Ok(config
                .inner()
                .secrets
                .iter()
                .map(|(name, group)| (name.as_str(), group))
                .collect());
        }

        requested
            .iter()
            .map(|name| config.group(name).map_err(Error::Config))
            .collect()
    }

    fn process_group(
        &self,
        target: &StoreTarget,
        name: &str,
        group: &SecretGroupConfig,
        direction: Direction,
    ) -> Result<GroupReport> {
        info!("Processing group '{}' ({})", name, direction);

        let mut transferred = Vec::new();
        for template in &group.mappings {
            let mappings = expand(self.client, target, template, direction)?;
            debug!(
                "{} -> {}: {} concrete mapping(s)",
                template.local,
                template.vault,
                mappings.len()
            );

            for mapping in mappings {
                match direction {
                    Direction::Read => {
                        let mode = resolve_mode(mapping.mode, group.mode());
                        read_one(self.client, target, &mapping, mode)?;
                    }
                    Direction::Write => {
                        write_one(self.client, target, &mapping, group.lease_ttl())?;
                    }
                }
                transferred.push(mapping);
            }
        }

        Ok(GroupReport {
            name: name.to_string(),
            mappings: transferred,
        })
    }
}
