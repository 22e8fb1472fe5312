//! Plain-text incident grid.

use std::fmt::Write as _;

use super::Style;
use crate::incident::Incident;

const HEADERS: [&str; 6] = ["ID", "Date", "Location", "Type", "Severity", "Reporter"];

/// Renders incidents as aligned columns, one row per incident.
pub fn render_incidents(incidents: &[&Incident]) -> String {
    if incidents.is_empty() {
        return format!("{}\n", Style::secondary("No matching incidents."));
    }

    let rows: Vec<[String; 6]> = incidents
        .iter()
        .map(|incident| {
            [
                incident.id.to_string(),
                incident.date.format("%Y-%m-%d %H:%M").to_string(),
                incident.location.clone(),
                incident.incident_type.to_string(),
                incident.severity.to_string(),
                incident.reporter.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect();
    let _ = writeln!(out, "{}", Style::header(header.join("  ").trim_end()));

    for (row, incident) in rows.iter().zip(incidents) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (cell, w))| {
                let padded = format!("{cell:<w$}");
                // Pad before coloring so escape codes don't skew alignment.
                if idx == 4 {
                    Style::severity(incident.severity, padded)
                } else {
                    padded
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }

    let _ = writeln!(
        out,
        "{}",
        Style::secondary(format!("{} incident(s)", incidents.len()))
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::incident::{IncidentType, Severity};

    fn incident(id: i64, location: &str) -> Incident {
        Incident {
            id,
            date: "2025-09-15T16:00:00Z".parse().unwrap(),
            location: location.to_string(),
            incident_type: IncidentType::Environmental,
            severity: Severity::Critical,
            description: "Spill near tailings pond".to_string(),
            reporter: "Ops Team".to_string(),
        }
    }

    #[test]
    fn test_render_empty() {
        assert!(render_incidents(&[]).contains("No matching incidents."));
    }

    #[test]
    fn test_render_rows() {
        let a = incident(4, "Kolwezi");
        let b = incident(12, "Main Shaft North");
        let rendered = render_incidents(&[&a, &b]);

        assert!(rendered.contains("Kolwezi"));
        assert!(rendered.contains("Main Shaft North"));
        assert!(rendered.contains("2025-09-15 16:00"));
        assert!(rendered.contains("Environmental"));
        assert!(rendered.contains("2 incident(s)"));
    }
}
