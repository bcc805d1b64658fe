//! Config command

use anyhow::{anyhow, Result};
use camino::Utf8Path;
use vaultsync_core::config::{generate_default_config, SyncConfig};
use vaultsync_core::types::FileMode;
use vaultsync_secrets::{resolve_mode, select_vault};

use crate::cli::{ConfigCommands, ConfigInitArgs, ConfigShowArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Init(args) => init(args),
        ConfigCommands::Validate => validate(config_path),
        ConfigCommands::Show(args) => show(args, config_path),
    }
}

fn init(args: ConfigInitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        return Err(anyhow!(
            "File {} already exists. Use --force to overwrite.",
            args.output
        ));
    }

    let content = generate_default_config(&args.vault_id, &args.address);
    if let Some(parent) = args.output.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.output, content)?;

    output::success(format!("Created {}", args.output));
    output::info(format!("Vault: {} ({})", args.vault_id, args.address));

    Ok(())
}

fn validate(config_path: Option<&Utf8Path>) -> Result<()> {
    let config = SyncConfig::load(config_path)?;
    config.validate()?;
    let selection = select_vault(&config, None)?;

    output::success(format!("Configuration is valid: {}", config.config_path));
    output::kv("Root", &config.root);
    output::kv(
        "Default vault",
        format!("{} ({})", selection.id, selection.vault.address),
    );
    if selection.has_conflict() {
        output::warning(format!(
            "{} additional vault(s) marked default are ignored",
            selection.conflicts
        ));
    }

    output::header("Secret groups");
    for (name, group) in config.inner().secrets.iter() {
        let mode = resolve_mode(FileMode::default(), group.mode());
        output::kv(
            name,
            format!("{} mapping(s), mode {}", group.mappings.len(), mode),
        );
    }

    Ok(())
}

fn show(args: ConfigShowArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = SyncConfig::load(config_path)?;

    if args.json {
        let json = serde_json::to_string_pretty(&config.config)?;
        println!("{}", json);
    } else {
        let yaml = config.to_yaml()?;
        println!("{}", yaml);
    }

    Ok(())
}
