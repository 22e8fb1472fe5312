use chrono::Datelike;
use std::collections::HashMap;

use crate::incident::{Incident, IncidentType, Severity};

const TOP_LOCATIONS: usize = 5;

/// Aggregate figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    /// Counts in [`IncidentType::ALL`] order.
    pub by_type: Vec<(IncidentType, usize)>,
    /// Counts in [`Severity::ALL`] order.
    pub by_severity: Vec<(Severity, usize)>,
    /// Incidents per calendar month, January first, across all years.
    pub by_month: [usize; 12],
    /// Busiest locations, most incidents first, ties by name.
    pub top_locations: Vec<(String, usize)>,
}

impl DashboardSummary {
    pub fn from_incidents(incidents: &[Incident]) -> Self {
        let count_severity =
            |severity: Severity| incidents.iter().filter(|i| i.severity == severity).count();

        let by_type = IncidentType::ALL
            .iter()
            .map(|&t| (t, incidents.iter().filter(|i| i.incident_type == t).count()))
            .collect();

        let by_severity = Severity::ALL
            .iter()
            .map(|&s| (s, count_severity(s)))
            .collect();

        let mut by_month = [0usize; 12];
        for incident in incidents {
            by_month[incident.date.month0() as usize] += 1;
        }

        let mut locations: HashMap<&str, usize> = HashMap::new();
        for incident in incidents {
            *locations.entry(incident.location.as_str()).or_default() += 1;
        }
        let mut top_locations: Vec<(String, usize)> = locations
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        top_locations.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_locations.truncate(TOP_LOCATIONS);

        Self {
            total: incidents.len(),
            critical: count_severity(Severity::Critical),
            high: count_severity(Severity::High),
            by_type,
            by_severity,
            by_month,
            top_locations,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn incident(location: &str, date: &str, severity: Severity) -> Incident {
        Incident {
            id: 0,
            date: date.parse().unwrap(),
            location: location.to_string(),
            incident_type: IncidentType::Equipment,
            severity,
            description: String::new(),
            reporter: String::new(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let incidents = vec![
            incident("Kolwezi", "2025-09-12T13:20:00Z", Severity::Medium),
            incident("Kolwezi", "2025-09-15T16:00:00Z", Severity::Critical),
            incident("Likasi", "2025-08-14T07:45:00Z", Severity::High),
        ];

        let summary = DashboardSummary::from_incidents(&incidents);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.by_month[8], 2);
        assert_eq!(summary.by_month[7], 1);
        assert_eq!(summary.by_type[1], (IncidentType::Equipment, 3));
        assert_eq!(summary.top_locations[0], ("Kolwezi".to_string(), 2));
    }

    #[test]
    fn test_top_locations_limited_and_tie_sorted() {
        let incidents: Vec<Incident> = ["F", "E", "D", "C", "B", "A"]
            .iter()
            .map(|loc| incident(loc, "2025-09-12T13:20:00Z", Severity::Low))
            .collect();

        let summary = DashboardSummary::from_incidents(&incidents);
        let names: Vec<&str> = summary
            .top_locations
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();

        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
    }
}
