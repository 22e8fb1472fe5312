use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

use super::model::{Incident, IncidentType, NewIncident, Severity};

/// Incident persistence backed by a single `SQLite` file.
///
/// A connection is opened per operation, so the store is cheap to clone and
/// safe to move onto blocking tasks.
#[derive(Debug, Clone)]
pub struct IncidentStore {
    db_path: PathBuf,
}

impl IncidentStore {
    /// Opens (creating if needed) the database at `db_path`.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let store = Self { db_path };
        store.init_db()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS incidents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                location TEXT NOT NULL,
                incident_type TEXT NOT NULL,
                severity TEXT NOT NULL,
                description TEXT NOT NULL,
                reporter TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )
        .context("Failed to create incidents table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_incidents_date ON incidents(date)",
            [],
        )
        .context("Failed to create index")?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path).with_context(|| {
            format!(
                "Failed to open incident database: {}",
                self.db_path.display()
            )
        })
    }

    /// Returns every incident, newest first.
    pub fn list(&self) -> Result<Vec<Incident>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, location, incident_type, severity, description, reporter
             FROM incidents ORDER BY date DESC, id DESC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RawIncident {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    location: row.get(2)?,
                    incident_type: row.get(3)?,
                    severity: row.get(4)?,
                    description: row.get(5)?,
                    reporter: row.get(6)?,
                })
            })
            .context("Failed to query incidents")?;

        let mut incidents = Vec::new();
        for raw in rows {
            incidents.push(raw?.into_incident()?);
        }
        Ok(incidents)
    }

    /// Stores a new incident and returns it with its assigned id.
    pub fn append(&self, incident: NewIncident) -> Result<Incident> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO incidents
             (date, location, incident_type, severity, description, reporter)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                incident.date.to_rfc3339(),
                incident.location,
                incident.incident_type.as_str(),
                incident.severity.as_str(),
                incident.description,
                incident.reporter,
            ],
        )
        .context("Failed to insert incident")?;

        let id = conn.last_insert_rowid();
        tracing::debug!(id, "incident stored");

        Ok(Incident {
            id,
            date: incident.date,
            location: incident.location,
            incident_type: incident.incident_type,
            severity: incident.severity,
            description: incident.description,
            reporter: incident.reporter,
        })
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM incidents", [], |row| row.get(0))
            .context("Failed to count incidents")?;
        Ok(count as usize)
    }

    /// Inserts the sample incidents when the store is empty. Returns how many were added.
    pub fn seed_if_empty(&self) -> Result<usize> {
        if self.count()? > 0 {
            return Ok(0);
        }

        let samples = sample_incidents()?;
        let added = samples.len();
        for incident in samples {
            self.append(incident)?;
        }
        Ok(added)
    }
}

struct RawIncident {
    id: i64,
    date: String,
    location: String,
    incident_type: String,
    severity: String,
    description: String,
    reporter: String,
}

impl RawIncident {
    fn into_incident(self) -> Result<Incident> {
        let date = DateTime::parse_from_rfc3339(&self.date)
            .with_context(|| format!("Invalid date on incident {}: {}", self.id, self.date))?
            .with_timezone(&Utc);

        Ok(Incident {
            id: self.id,
            date,
            location: self.location,
            incident_type: self.incident_type.parse::<IncidentType>()?,
            severity: self.severity.parse::<Severity>()?,
            description: self.description,
            reporter: self.reporter,
        })
    }
}

fn sample_incidents() -> Result<Vec<NewIncident>> {
    let sample = |date: &str,
                  location: &str,
                  incident_type: IncidentType,
                  severity: Severity,
                  description: &str,
                  reporter: &str|
     -> Result<NewIncident> {
        Ok(NewIncident {
            date: DateTime::parse_from_rfc3339(date)?.with_timezone(&Utc),
            location: location.to_string(),
            incident_type,
            severity,
            description: description.to_string(),
            reporter: reporter.to_string(),
        })
    };

    Ok(vec![
        sample(
            "2025-09-10T09:30:00Z",
            "Kamituga",
            IncidentType::Injury,
            Severity::High,
            "Worker slipped in wet area; fracture suspected.",
            "Jean M.",
        )?,
        sample(
            "2025-09-12T13:20:00Z",
            "Kolwezi",
            IncidentType::Equipment,
            Severity::Medium,
            "Hydraulic leak on excavator #EX21.",
            "Amina K.",
        )?,
        sample(
            "2025-09-14T07:45:00Z",
            "Likasi",
            IncidentType::NearMiss,
            Severity::Low,
            "Loose rockfall near conveyor, no injuries.",
            "Paul T.",
        )?,
        sample(
            "2025-09-15T16:00:00Z",
            "Kolwezi",
            IncidentType::Environmental,
            Severity::Critical,
            "Spill near tailings pond, requires containment.",
            "Ops Team",
        )?,
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store(temp_dir: &TempDir) -> IncidentStore {
        IncidentStore::open(temp_dir.path().join("incidents.db")).unwrap()
    }

    fn create_test_incident(location: &str, date: &str) -> NewIncident {
        NewIncident {
            date: date.parse().unwrap(),
            location: location.to_string(),
            incident_type: IncidentType::Equipment,
            severity: Severity::High,
            description: "Conveyor belt snapped".to_string(),
            reporter: "Shift lead".to_string(),
        }
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        let first = store
            .append(create_test_incident("Main Shaft", "2025-10-01T08:00:00Z"))
            .unwrap();
        let second = store
            .append(create_test_incident("Tunnel B", "2025-10-02T08:00:00Z"))
            .unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn test_list_is_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store
            .append(create_test_incident("Older", "2025-10-01T08:00:00Z"))
            .unwrap();
        store
            .append(create_test_incident("Newer", "2025-10-05T08:00:00Z"))
            .unwrap();

        let incidents = store.list().unwrap();
        assert_eq!(incidents[0].location, "Newer");
        assert_eq!(incidents[1].location, "Older");
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        let stored = store
            .append(create_test_incident("Main Shaft", "2025-10-01T08:00:00Z"))
            .unwrap();
        let listed = store.list().unwrap();

        assert_eq!(listed, vec![stored]);
    }

    #[test]
    fn test_seed_if_empty_only_once() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        assert_eq!(store.seed_if_empty().unwrap(), 4);
        assert_eq!(store.seed_if_empty().unwrap(), 0);
        assert_eq!(store.count().unwrap(), 4);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("incidents.db");

        IncidentStore::open(&path)
            .unwrap()
            .append(create_test_incident("Likasi", "2025-10-01T08:00:00Z"))
            .unwrap();

        let reopened = IncidentStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
