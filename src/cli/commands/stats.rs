//! Dashboard summary: `minesafe stats`.

use anyhow::Result;
use chrono::Month;

use super::{load_config, open_store};
use crate::config::ResolveOptions;
use crate::i18n::{Locale, keys};
use crate::stats::DashboardSummary;
use crate::ui::Style;

pub fn run_stats(options: &ResolveOptions) -> Result<()> {
    let config = load_config(options)?;
    let store = open_store(&config)?;
    let summary = DashboardSummary::from_incidents(&store.list()?);

    print_summary(&summary, config.locale);
    Ok(())
}

fn print_summary(summary: &DashboardSummary, locale: Locale) {
    println!(
        "{}  {}",
        Style::label(locale.t(keys::TOTAL_INCIDENTS)),
        Style::value(summary.total)
    );
    println!(
        "{}  {}",
        Style::label(locale.t(keys::CRITICAL_INCIDENTS)),
        Style::value(summary.critical)
    );
    println!(
        "{}  {}",
        Style::label(locale.t(keys::HIGH_SEVERITY)),
        Style::value(summary.high)
    );
    println!();

    println!("{}", Style::header(locale.t(keys::INCIDENTS_BY_TYPE)));
    for (incident_type, count) in &summary.by_type {
        println!("  {:<14} {}", incident_type.as_str(), Style::value(count));
    }
    println!();

    println!("{}", Style::header(locale.t(keys::SEVERITY_DISTRIBUTION)));
    for (severity, count) in &summary.by_severity {
        println!(
            "  {} {}",
            Style::severity(*severity, format!("{:<14}", severity.as_str())),
            Style::value(count)
        );
    }
    println!();

    println!("{}", Style::header(locale.t(keys::INCIDENTS_BY_MONTH)));
    for (idx, count) in summary.by_month.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let name = Month::try_from(idx as u8 + 1).map_or("?", |m| m.name());
        println!("  {name:<14} {}", Style::value(count));
    }
    println!();

    println!("{}", Style::header(locale.t(keys::TOP_LOCATIONS)));
    if summary.top_locations.is_empty() {
        println!("  {}", Style::secondary("-"));
    }
    for (location, count) in &summary.top_locations {
        println!("  {location:<24} {}", Style::value(count));
    }
}
