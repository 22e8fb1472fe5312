use anyhow::bail;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a safety incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum IncidentType {
    Injury,
    Equipment,
    #[serde(rename = "Near-Miss")]
    #[value(name = "near-miss")]
    NearMiss,
    Environmental,
}

impl IncidentType {
    /// All types in declaration order. Tie-breaks on counts follow this order.
    pub const ALL: [Self; 4] = [
        Self::Injury,
        Self::Equipment,
        Self::NearMiss,
        Self::Environmental,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Injury => "Injury",
            Self::Equipment => "Equipment",
            Self::NearMiss => "Near-Miss",
            Self::Environmental => "Environmental",
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        match normalized.as_str() {
            "injury" => Ok(Self::Injury),
            "equipment" => Ok(Self::Equipment),
            "near-miss" | "nearmiss" => Ok(Self::NearMiss),
            "environmental" => Ok(Self::Environmental),
            _ => bail!("Unknown incident type: '{s}'"),
        }
    }
}

/// How serious an incident is, from least to most.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => bail!("Unknown severity: '{s}'"),
        }
    }
}

/// A recorded safety incident. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Store-assigned identifier, unique and increasing.
    pub id: i64,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub severity: Severity,
    pub description: String,
    pub reporter: String,
}

/// An incident as submitted, before the store assigns its id.
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub date: DateTime<Utc>,
    pub location: String,
    pub incident_type: IncidentType,
    pub severity: Severity,
    pub description: String,
    pub reporter: String,
}
