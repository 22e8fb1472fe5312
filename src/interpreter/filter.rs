use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::fmt;

use crate::incident::Incident;

/// Incident attribute a clause tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Location,
    Type,
    Severity,
    Date,
}

impl Field {
    fn text_of(self, incident: &Incident) -> Option<&str> {
        match self {
            Self::Location => Some(incident.location.as_str()),
            Self::Type => Some(incident.incident_type.as_str()),
            Self::Severity => Some(incident.severity.as_str()),
            Self::Date => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Contains,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Date(DateTime<FixedOffset>),
}

/// A single field-level condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    pub field: Field,
    pub operator: Operator,
    pub value: FilterValue,
}

impl Clause {
    pub fn eq(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            operator: Operator::Eq,
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn contains(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            operator: Operator::Contains,
            value: FilterValue::Text(value.into()),
        }
    }

    pub const fn date_gte(bound: DateTime<FixedOffset>) -> Self {
        Self {
            field: Field::Date,
            operator: Operator::Gte,
            value: FilterValue::Date(bound),
        }
    }

    pub const fn date_lt(bound: DateTime<FixedOffset>) -> Self {
        Self {
            field: Field::Date,
            operator: Operator::Lt,
            value: FilterValue::Date(bound),
        }
    }

    pub const fn date_lte(bound: DateTime<FixedOffset>) -> Self {
        Self {
            field: Field::Date,
            operator: Operator::Lte,
            value: FilterValue::Date(bound),
        }
    }

    pub fn matches(&self, incident: &Incident) -> bool {
        match &self.value {
            FilterValue::Date(bound) => {
                if self.field != Field::Date {
                    return false;
                }
                let bound = bound.with_timezone(&Utc);
                match self.operator {
                    Operator::Eq => incident.date == bound,
                    Operator::Gte => incident.date >= bound,
                    Operator::Lt => incident.date < bound,
                    Operator::Lte => incident.date <= bound,
                    Operator::Contains => false,
                }
            }
            FilterValue::Text(expected) => {
                let Some(actual) = self.field.text_of(incident) else {
                    return false;
                };
                let (actual, expected) = (fold(actual), fold(expected));
                match self.operator {
                    Operator::Eq => actual == expected,
                    Operator::Contains => actual.contains(&expected),
                    Operator::Gte | Operator::Lt | Operator::Lte => false,
                }
            }
        }
    }
}

// Case-insensitive, and "near-miss" == "near miss".
fn fold(s: &str) -> String {
    s.trim().to_lowercase().replace('-', " ")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Logic {
    #[default]
    And,
}

/// A conjunction of clauses over incident fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterPredicate {
    pub logic: Logic,
    pub clauses: Vec<Clause>,
}

impl FilterPredicate {
    pub const fn all(clauses: Vec<Clause>) -> Self {
        Self {
            logic: Logic::And,
            clauses,
        }
    }

    pub fn matches(&self, incident: &Incident) -> bool {
        match self.logic {
            Logic::And => self.clauses.iter().all(|clause| clause.matches(incident)),
        }
    }

    /// Incidents from `incidents` that satisfy every clause, in input order.
    pub fn apply<'a>(&self, incidents: &'a [Incident]) -> Vec<&'a Incident> {
        incidents.iter().filter(|i| self.matches(i)).collect()
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, clause) in self.clauses.iter().enumerate() {
            if idx > 0 {
                f.write_str(" and ")?;
            }
            let field = match clause.field {
                Field::Location => "location",
                Field::Type => "type",
                Field::Severity => "severity",
                Field::Date => "date",
            };
            let op = match clause.operator {
                Operator::Eq => "=",
                Operator::Contains => "contains",
                Operator::Gte => ">=",
                Operator::Lt => "<",
                Operator::Lte => "<=",
            };
            match &clause.value {
                FilterValue::Text(text) => write!(f, "{field} {op} \"{text}\"")?,
                FilterValue::Date(date) => {
                    write!(f, "{field} {op} {}", date.format("%Y-%m-%d %H:%M"))?;
                }
            }
        }
        Ok(())
    }
}

/// What an utterance means for the active filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "predicate", rename_all = "snake_case")]
pub enum FilterOutcome {
    /// Replace the active filter.
    Apply(FilterPredicate),
    /// Drop all filtering.
    Clear,
    /// The utterance was understood but says nothing about filtering.
    NoOpinion,
    /// Nothing matched; the active filter stays as it is.
    NotUnderstood,
}

impl FilterOutcome {
    /// The change a filter consumer should act on, if any.
    pub fn as_change(&self) -> Option<FilterChange<'_>> {
        match self {
            Self::Apply(predicate) => Some(FilterChange::Apply(predicate)),
            Self::Clear => Some(FilterChange::Clear),
            Self::NoOpinion | Self::NotUnderstood => None,
        }
    }
}

/// A change delivered to a filter consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange<'a> {
    Apply(&'a FilterPredicate),
    Clear,
}

/// The interpreter's answer to one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub filter: FilterOutcome,
    /// Never empty.
    pub response_text: String,
}

impl CommandResult {
    pub fn new(filter: FilterOutcome, response_text: impl Into<String>) -> Self {
        Self {
            filter,
            response_text: response_text.into(),
        }
    }

    /// A reply that leaves filtering untouched.
    pub fn reply(response_text: impl Into<String>) -> Self {
        Self::new(FilterOutcome::NoOpinion, response_text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::incident::{IncidentType, Severity};

    fn incident(location: &str, incident_type: IncidentType, severity: Severity) -> Incident {
        Incident {
            id: 1,
            date: "2025-09-15T16:00:00Z".parse().unwrap(),
            location: location.to_string(),
            incident_type,
            severity,
            description: "Spill near tailings pond".to_string(),
            reporter: "Ops Team".to_string(),
        }
    }

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let clause = Clause::contains(Field::Location, "main shaft");
        let hit = incident("Main Shaft North", IncidentType::Injury, Severity::Low);
        let miss = incident("Tunnel B", IncidentType::Injury, Severity::Low);

        assert!(clause.matches(&hit));
        assert!(!clause.matches(&miss));
    }

    #[test]
    fn test_eq_on_severity() {
        let clause = Clause::eq(Field::Severity, "Critical");
        assert!(clause.matches(&incident("Kolwezi", IncidentType::Injury, Severity::Critical)));
        assert!(!clause.matches(&incident("Kolwezi", IncidentType::Injury, Severity::High)));
    }

    #[test]
    fn test_type_matching_ignores_hyphen() {
        let clause = Clause::contains(Field::Type, "near miss");
        assert!(clause.matches(&incident("Likasi", IncidentType::NearMiss, Severity::Low)));
    }

    #[test]
    fn test_date_bounds() {
        let target = incident("Kolwezi", IncidentType::Injury, Severity::Low);

        assert!(Clause::date_gte(at("2025-09-15T16:00:00Z")).matches(&target));
        assert!(!Clause::date_lt(at("2025-09-15T16:00:00Z")).matches(&target));
        // Offsets are compared as instants.
        assert!(Clause::date_lt(at("2025-09-15T18:00:01+02:00")).matches(&target));
        assert!(Clause::date_lte(at("2025-09-15T16:00:00Z")).matches(&target));
        assert!(!Clause::date_lte(at("2025-09-15T15:59:59Z")).matches(&target));
    }

    #[test]
    fn test_text_value_on_date_field_never_matches() {
        let clause = Clause::contains(Field::Date, "2025");
        assert!(!clause.matches(&incident("Kolwezi", IncidentType::Injury, Severity::Low)));
    }

    #[test]
    fn test_predicate_requires_all_clauses() {
        let predicate = FilterPredicate::all(vec![
            Clause::eq(Field::Severity, "Critical"),
            Clause::contains(Field::Location, "kolwezi"),
        ]);
        let incidents = vec![
            incident("Kolwezi", IncidentType::Environmental, Severity::Critical),
            incident("Kolwezi", IncidentType::Equipment, Severity::Medium),
            incident("Likasi", IncidentType::Injury, Severity::Critical),
        ];

        let matched = predicate.apply(&incidents);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].incident_type, IncidentType::Environmental);
    }

    #[test]
    fn test_outcome_changes() {
        let predicate = FilterPredicate::all(vec![Clause::eq(Field::Severity, "Low")]);
        let apply = FilterOutcome::Apply(predicate.clone());

        assert_eq!(apply.as_change(), Some(FilterChange::Apply(&predicate)));
        assert_eq!(FilterOutcome::Clear.as_change(), Some(FilterChange::Clear));
        assert_eq!(FilterOutcome::NoOpinion.as_change(), None);
        assert_eq!(FilterOutcome::NotUnderstood.as_change(), None);
    }

    #[test]
    fn test_clear_and_not_understood_serialize_differently() {
        let clear = serde_json::to_value(FilterOutcome::Clear).unwrap();
        let unknown = serde_json::to_value(FilterOutcome::NotUnderstood).unwrap();

        assert_eq!(clear["kind"], "clear");
        assert_eq!(unknown["kind"], "not_understood");
    }

    #[test]
    fn test_display() {
        let predicate = FilterPredicate::all(vec![
            Clause::contains(Field::Location, "Main Shaft"),
            Clause::date_gte(at("2025-09-15T00:00:00Z")),
        ]);
        assert_eq!(
            predicate.to_string(),
            "location contains \"Main Shaft\" and date >= 2025-09-15 00:00"
        );
    }
}
