//! Incident records and their `SQLite` store.

mod model;
mod store;

pub use model::{Incident, IncidentType, NewIncident, Severity};
pub use store::IncidentStore;
