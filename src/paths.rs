//! XDG-style path utilities for configuration and data directories.
//!
//! XDG Base Directory conventions are preferred over OS-specific locations
//! on every platform.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "minesafe";

/// Returns the configuration directory for minesafe.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/minesafe` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/minesafe` otherwise
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

/// Returns the data directory for minesafe, where the incident database lives.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/minesafe` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/minesafe` otherwise
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn data_dir() -> Result<PathBuf> {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

/// Default location of the incident database.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_database() -> Result<PathBuf> {
    Ok(data_dir()?.join("incidents.db"))
}

fn xdg_dir(var: &str, fallback: &[&str]) -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var(var)
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(fallback
        .iter()
        .fold(home, |path, segment| path.join(segment))
        .join(APP_DIR))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_var<T>(name: &str, value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let original = std::env::var(name).ok();
        match value {
            Some(v) => unsafe { std::env::set_var(name, v) },
            None => unsafe { std::env::remove_var(name) },
        }

        let result = f();

        match original {
            Some(v) => unsafe { std::env::set_var(name, v) },
            None => unsafe { std::env::remove_var(name) },
        }
        result
    }

    #[test]
    #[serial]
    fn test_config_dir_default() {
        let dir = with_var("XDG_CONFIG_HOME", None, config_dir).unwrap();
        assert!(dir.ends_with(".config/minesafe"));
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        let dir = with_var("XDG_CONFIG_HOME", Some("/custom/config"), config_dir).unwrap();
        assert_eq!(dir, PathBuf::from("/custom/config/minesafe"));
    }

    #[test]
    #[serial]
    fn test_data_dir_default() {
        let dir = with_var("XDG_DATA_HOME", None, data_dir).unwrap();
        assert!(dir.ends_with(".local/share/minesafe"));
    }

    #[test]
    #[serial]
    fn test_default_database_under_xdg_data_home() {
        let db = with_var("XDG_DATA_HOME", Some("/srv/data"), default_database).unwrap();
        assert_eq!(db, PathBuf::from("/srv/data/minesafe/incidents.db"));
    }

    #[test]
    #[serial]
    fn test_empty_xdg_var_falls_back_to_home() {
        let dir = with_var("XDG_DATA_HOME", Some(""), data_dir).unwrap();
        assert!(dir.ends_with(".local/share/minesafe"));
    }
}
