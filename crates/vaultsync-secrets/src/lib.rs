//! Secret synchronization engine for vaultsync
//!
//! This crate turns configured mappings into concrete transfers between a
//! vault and the local filesystem:
//! - **Expansion**: wildcard mappings become one mapping per vault key or local file
//! - **Policy**: effective file mode from mapping, group and default settings
//! - **Transfer**: one read (vault -> file) or write (file -> vault), with optional base64
//! - **Orchestration**: vault selection, single authentication, group-by-group processing
//!
//! All vault access goes through the [`SecretStoreClient`] capability; [`VaultCli`]
//! implements it on top of the vault command-line client.

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod expand;
pub mod policy;
pub mod sync;
pub mod transfer;
pub mod types;

pub use auth::authenticate;
pub use client::{SecretStoreClient, StoreTarget, VaultCli};
pub use endpoint::{select_vault, VaultSelection};
pub use error::{Error, Result};
pub use expand::{expand, expand_for_read, expand_for_write};
pub use policy::{resolve_mode, DEFAULT_FILE_MODE};
pub use sync::{GroupReport, SyncReport, Synchronizer};
pub use transfer::{read_one, write_one};
pub use types::{ConcreteMapping, Direction, SyncRequest};
