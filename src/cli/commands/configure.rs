//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Select, Text};
use std::path::PathBuf;

use crate::config::{ConfigFile, ConfigManager, MinesafeConfig};
use crate::i18n::Locale;
use crate::paths;
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command.
///
/// With `show`, prints the current defaults. Otherwise asks for the default
/// locale and database path and saves them.
pub fn run_configure(show: bool) -> Result<()> {
    if show {
        let manager = ConfigManager::new()?;
        print_current_defaults(&manager, &manager.load_or_default());
        return Ok(());
    }
    if handle_prompt_cancellation(run_configure_inner)?.is_none() {
        crate::status!("{}", Style::secondary("Configuration unchanged."));
    }
    Ok(())
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default();

    print_current_defaults(&manager, &config);

    let locale = select_locale(config.minesafe.locale.as_deref())?;
    let database = input_database(config.minesafe.database.as_ref())?;

    config.minesafe = MinesafeConfig {
        locale: Some(locale.code().to_string()),
        database,
    };

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );

    Ok(())
}

fn print_current_defaults(manager: &ConfigManager, config: &ConfigFile) {
    println!("{}", Style::header("Current defaults"));
    println!(
        "  {}    {}",
        Style::label("locale"),
        config
            .minesafe
            .locale
            .as_deref()
            .map_or_else(|| Style::secondary("(not set)"), Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("database"),
        config.minesafe.database.as_ref().map_or_else(
            || Style::secondary("(not set)"),
            |path| Style::value(path.display())
        )
    );
    println!(
        "  {}    {}",
        Style::label("config"),
        Style::secondary(manager.config_path().display())
    );
    println!();
}

fn select_locale(current: Option<&str>) -> Result<Locale> {
    let current = current.and_then(|code| code.parse::<Locale>().ok());
    let default_index = current
        .and_then(|c| Locale::ALL.iter().position(|l| *l == c))
        .unwrap_or(0);

    let options: Vec<String> = Locale::ALL
        .iter()
        .map(|l| format!("{} - {l}", l.code()))
        .collect();

    let selection = Select::new("Default language:", options)
        .with_starting_cursor(default_index)
        .raw_prompt()?;

    Ok(Locale::ALL[selection.index])
}

fn input_database(current: Option<&PathBuf>) -> Result<Option<PathBuf>> {
    let fallback = paths::default_database()?.display().to_string();
    let current = current.map(|p| p.display().to_string());

    let mut prompt = Text::new("Incident database:")
        .with_help_message("Leave empty to use the default location");
    prompt = match current.as_deref() {
        Some(current) => prompt.with_default(current),
        None => prompt.with_placeholder(&fallback),
    };

    let answer = prompt.prompt()?;
    let answer = answer.trim();

    if answer.is_empty() {
        return Ok(None);
    }
    if answer.ends_with('/') {
        bail!("Database path must name a file, not a directory");
    }
    Ok(Some(PathBuf::from(answer)))
}
