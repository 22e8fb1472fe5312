use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::i18n::Locale;
use crate::paths;
use crate::ui::Style;

/// Default settings in the `[minesafe]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinesafeConfig {
    /// Default display language (`en` or `fr`).
    pub locale: Option<String>,
    /// Path of the incident database.
    pub database: Option<PathBuf>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/minesafe/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub minesafe: MinesafeConfig,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub locale: Option<Locale>,
    pub database: Option<PathBuf>,
}

/// Settings after merging CLI arguments, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub locale: Locale,
    pub database: PathBuf,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options win over the config file, which wins over the defaults
/// (English, `$XDG_DATA_HOME/minesafe/incidents.db`).
///
/// # Errors
///
/// Returns an error if the config file names an unsupported locale or the
/// default database location cannot be determined.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let locale = match (options.locale, config_file.minesafe.locale.as_deref()) {
        (Some(locale), _) => locale,
        (None, Some(code)) => code
            .parse()
            .with_context(|| "Invalid 'locale' in config file")?,
        (None, None) => Locale::default(),
    };

    let database = match options
        .database
        .as_ref()
        .or(config_file.minesafe.database.as_ref())
    {
        Some(path) => path.clone(),
        None => paths::default_database()?,
    };

    Ok(ResolvedConfig { locale, database })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/minesafe/config.toml`
    /// or `~/.config/minesafe/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// Uses an explicit config file location.
    pub fn at(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the config file, or the defaults when it is missing.
    ///
    /// A file that exists but cannot be parsed is reported on stderr and ignored.
    pub fn load_or_default(&self) -> ConfigFile {
        if !self.config_path.exists() {
            return ConfigFile::default();
        }
        self.load().unwrap_or_else(|e| {
            crate::warn!(
                "{} Ignoring config file, using defaults: {e:#}",
                Style::warning("Warning:")
            );
            ConfigFile::default()
        })
    }
}
