//! `minesafe incidents list|add|export`.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use std::path::Path;

use super::{load_config, open_store};
use crate::cli::{IncidentsCommand, ListFilters};
use crate::config::ResolveOptions;
use crate::fs::atomic_write;
use crate::i18n::keys;
use crate::incident::{Incident, NewIncident};
use crate::interpreter::{Clause, Field, FilterPredicate};
use crate::ui::{Style, render_incidents};

pub fn run_incidents(command: IncidentsCommand, options: &ResolveOptions) -> Result<()> {
    let config = load_config(options)?;
    let store = open_store(&config)?;

    match command {
        IncidentsCommand::List { filters } => {
            let incidents = store.list()?;
            let shown = match list_predicate(&filters)? {
                Some(predicate) => predicate.apply(&incidents),
                None => incidents.iter().collect(),
            };
            print!("{}", render_incidents(&shown));
        }
        IncidentsCommand::Add {
            location,
            incident_type,
            severity,
            description,
            reporter,
            date,
        } => {
            let incident = store.append(NewIncident {
                date: date.unwrap_or_else(Utc::now),
                location,
                incident_type,
                severity,
                description,
                reporter,
            })?;
            println!(
                "{} {} (#{})",
                Style::success("✓"),
                config.locale.t(keys::INCIDENT_CREATED),
                incident.id
            );
        }
        IncidentsCommand::Export { path } => {
            let count = export(&store.list()?, &path)?;
            crate::status!(
                "{} Exported {count} incident(s) to {}",
                Style::success("✓"),
                Style::secondary(path.display())
            );
        }
    }

    Ok(())
}

/// Turns the list flags into an AND of clauses. `None` when no flag is set.
fn list_predicate(filters: &ListFilters) -> Result<Option<FilterPredicate>> {
    if let (Some(from), Some(to)) = (filters.from, filters.to)
        && from > to
    {
        bail!("--from ({}) is after --to ({})", from.to_rfc3339(), to.to_rfc3339());
    }

    let mut clauses = Vec::new();
    if let Some(incident_type) = filters.incident_type {
        clauses.push(Clause::eq(Field::Type, incident_type.as_str()));
    }
    if let Some(severity) = filters.severity {
        clauses.push(Clause::eq(Field::Severity, severity.as_str()));
    }
    if let Some(from) = filters.from {
        clauses.push(Clause::date_gte(from.fixed_offset()));
    }
    if let Some(to) = filters.to {
        clauses.push(Clause::date_lte(to.fixed_offset()));
    }

    Ok((!clauses.is_empty()).then(|| FilterPredicate::all(clauses)))
}

fn export(incidents: &[Incident], path: &Path) -> Result<usize> {
    let json = serde_json::to_string_pretty(incidents).context("Failed to serialize incidents")?;
    atomic_write(path, &json)?;
    Ok(incidents.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::incident::{IncidentStore, IncidentType, Severity};
    use chrono::{DateTime, TimeDelta};
    use tempfile::TempDir;

    fn seeded_store(temp_dir: &TempDir) -> IncidentStore {
        let store = IncidentStore::open(temp_dir.path().join("incidents.db")).unwrap();
        store.seed_if_empty().unwrap();
        store
    }

    fn utc(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    fn locations(incidents: &[&Incident]) -> Vec<String> {
        incidents.iter().map(|i| i.location.clone()).collect()
    }

    #[test]
    fn test_list_predicate_empty_without_flags() {
        assert!(list_predicate(&ListFilters::default()).unwrap().is_none());
    }

    #[test]
    fn test_list_predicate_type_and_severity() {
        let temp_dir = TempDir::new().unwrap();
        let incidents = seeded_store(&temp_dir).list().unwrap();
        let filters = ListFilters {
            incident_type: Some(IncidentType::Environmental),
            severity: Some(Severity::Critical),
            ..ListFilters::default()
        };

        let predicate = list_predicate(&filters).unwrap().unwrap();

        assert_eq!(predicate.clauses.len(), 2);
        assert_eq!(locations(&predicate.apply(&incidents)), ["Kolwezi"]);
    }

    #[test]
    fn test_list_predicate_upper_bound_is_inclusive() {
        let temp_dir = TempDir::new().unwrap();
        let incidents = seeded_store(&temp_dir).list().unwrap();
        let filters = ListFilters {
            from: Some(utc("2025-09-12T13:20:00Z")),
            to: Some(utc("2025-09-14T07:45:00Z")),
            ..ListFilters::default()
        };

        let shown = list_predicate(&filters).unwrap().unwrap().apply(&incidents);

        assert_eq!(locations(&shown), ["Likasi", "Kolwezi"]);
    }

    #[test]
    fn test_list_predicate_open_ended_range() {
        let temp_dir = TempDir::new().unwrap();
        let incidents = seeded_store(&temp_dir).list().unwrap();
        let filters = ListFilters {
            from: Some(utc("2025-09-14T07:45:00Z") + TimeDelta::seconds(1)),
            ..ListFilters::default()
        };

        let shown = list_predicate(&filters).unwrap().unwrap().apply(&incidents);

        assert_eq!(locations(&shown), ["Kolwezi"]);
        assert_eq!(shown[0].severity, Severity::Critical);
    }

    #[test]
    fn test_list_predicate_rejects_inverted_range() {
        let filters = ListFilters {
            from: Some(utc("2025-09-15T00:00:00Z")),
            to: Some(utc("2025-09-14T00:00:00Z")),
            ..ListFilters::default()
        };

        let err = list_predicate(&filters).unwrap_err();
        assert!(err.to_string().contains("is after --to"));
    }

    #[test]
    fn test_export_writes_json_array() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let path = temp_dir.path().join("out/incidents.json");

        let count = export(&store.list().unwrap(), &path).unwrap();

        let exported: Vec<Incident> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(count, 4);
        assert_eq!(exported, store.list().unwrap());
    }
}
