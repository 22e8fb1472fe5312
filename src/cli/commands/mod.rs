//! Subcommand implementations.

use anyhow::Result;

use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::incident::IncidentStore;

/// One-shot interpretation handler.
pub mod ask;

/// Chat mode command handler.
pub mod chat;

/// Configure command handler.
pub mod configure;

/// Incident list/add/export handlers.
pub mod incidents;

/// Dashboard summary handler.
pub mod stats;

/// Merges CLI overrides with the config file.
pub fn load_config(options: &ResolveOptions) -> Result<ResolvedConfig> {
    let manager = ConfigManager::new()?;
    resolve_config(options, &manager.load_or_default())
}

/// Opens the configured store, seeding the sample incidents into a new one.
pub fn open_store(config: &ResolvedConfig) -> Result<IncidentStore> {
    let store = IncidentStore::open(&config.database)?;
    let seeded = store.seed_if_empty()?;
    if seeded > 0 {
        crate::info!(
            "Created incident database at {} with {seeded} sample incidents",
            store.path().display()
        );
    }
    Ok(store)
}
