//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// vaultsync - Keep local secret files and a Vault server in sync
#[derive(Parser, Debug)]
#[command(name = "vaultsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to vaultsync.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy secrets from the vault into local files
    Read(SyncArgs),

    /// Copy local files into the vault
    Write(SyncArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Secret groups to process (default: all, in config order)
    #[arg(value_name = "GROUP")]
    pub groups: Vec<String>,

    /// Vault id to use instead of the default vault
    #[arg(long)]
    pub vault: Option<String>,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new vaultsync.yaml
    Init(ConfigInitArgs),

    /// Validate the configuration
    Validate,

    /// Show resolved configuration
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Id of the generated vault entry
    #[arg(long, default_value = "default")]
    pub vault_id: String,

    /// Vault server address
    #[arg(long, env = "VAULT_ADDR", default_value = "http://127.0.0.1:8200")]
    pub address: String,

    /// Output file path
    #[arg(short, long, default_value = "vaultsync.yaml")]
    pub output: Utf8PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
