use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::i18n::Locale;
use crate::incident::{IncidentType, Severity};

#[derive(Parser, Debug)]
#[command(name = "minesafe")]
#[command(about = "Mine-site safety incident log with a plain-language assistant")]
#[command(version)]
pub struct Args {
    /// Display language (en, fr)
    #[arg(short = 'l', long, global = true, value_parser = parse_locale)]
    pub locale: Option<Locale>,

    /// Incident database path
    #[arg(short = 'd', long, global = true)]
    pub database: Option<PathBuf>,

    /// Suppress status messages
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log diagnostics to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chat with the incident assistant
    Chat,
    /// Interpret a single message and print the reply
    Ask {
        /// The message, e.g. "show critical incidents"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print the interpreter result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List, record and export incidents
    Incidents {
        #[command(subcommand)]
        command: IncidentsCommand,
    },
    /// Show the incident dashboard summary
    Stats,
    /// Configure minesafe defaults
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum IncidentsCommand {
    /// List incidents, newest first
    List {
        #[command(flatten)]
        filters: ListFilters,
    },
    /// Record a new incident
    Add {
        /// Where it happened
        #[arg(long)]
        location: String,

        /// Incident category
        #[arg(short = 't', long = "type", value_enum)]
        incident_type: IncidentType,

        /// How serious it was
        #[arg(short = 's', long, value_enum)]
        severity: Severity,

        /// What happened
        #[arg(long)]
        description: String,

        /// Who reported it
        #[arg(long)]
        reporter: String,

        /// When it happened (RFC 3339 or YYYY-MM-DD); defaults to now
        #[arg(long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,
    },
    /// Write all incidents to a JSON file
    Export {
        /// Destination file
        path: PathBuf,
    },
}

/// Manual filters for `incidents list`. All given filters must match.
#[derive(clap::Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct ListFilters {
    /// Only this incident category
    #[arg(short = 't', long = "type", value_enum)]
    pub incident_type: Option<IncidentType>,

    /// Only this severity
    #[arg(short = 's', long, value_enum)]
    pub severity: Option<Severity>,

    /// Earliest date, inclusive (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<DateTime<Utc>>,

    /// Latest date, inclusive; a bare day covers the whole day
    #[arg(long, value_parser = parse_end_date)]
    pub to: Option<DateTime<Utc>>,
}

fn parse_locale(value: &str) -> Result<Locale, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

/// Accepts RFC 3339 timestamps or a bare `YYYY-MM-DD` (midnight UTC).
fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }
    parse_day(value).map(|day| day.and_time(NaiveTime::MIN).and_utc())
}

/// Like [`parse_date`], but a bare day means its last instant.
fn parse_end_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }
    let day = parse_day(value)?;
    Ok(day.and_time(NaiveTime::MIN).and_utc() + TimeDelta::days(1) - TimeDelta::nanoseconds(1))
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{value}' (expected RFC 3339 or YYYY-MM-DD)"))
}
