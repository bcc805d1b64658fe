//! Read and write commands

use anyhow::Result;
use camino::Utf8Path;
use vaultsync_core::SyncConfig;
use vaultsync_secrets::{Direction, SyncReport, SyncRequest, Synchronizer, VaultCli};

use crate::cli::SyncArgs;
use crate::output;

pub fn read(args: SyncArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    run(Direction::Read, args, config_path)
}

pub fn write(args: SyncArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    run(Direction::Write, args, config_path)
}

fn run(direction: Direction, args: SyncArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = SyncConfig::load(config_path)?;
    let request = SyncRequest::new(direction)
        .with_groups(args.groups)
        .with_vault(args.vault);

    let client = VaultCli::new();
    let report = Synchronizer::new(&config, &client).run(&request)?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &SyncReport) {
    if report.default_conflicts > 0 {
        output::warning(format!(
            "{} additional vault(s) marked default, used '{}'",
            report.default_conflicts, report.vault
        ));
    }

    let verb = match report.direction {
        Direction::Read => "Read",
        Direction::Write => "Wrote",
    };
    output::success(format!(
        "{} {} secret(s) in {} group(s) using vault '{}'",
        verb,
        report.transferred(),
        report.groups.len(),
        report.vault
    ));
}
