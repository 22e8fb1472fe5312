//! Configuration file management.

mod manager;

pub use manager::{
    ConfigFile, ConfigManager, MinesafeConfig, ResolveOptions, ResolvedConfig, resolve_config,
};
