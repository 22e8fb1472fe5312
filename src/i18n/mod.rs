//! Locale catalog for the assistant's welcome/help text and the CLI labels.
//!
//! Only a handful of strings are translated. Filter confirmations produced by
//! the interpreter's rule table are English in every locale.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    English,
    French,
}

impl Locale {
    pub const ALL: [Self; 2] = [Self::English, Self::French];

    /// Short code used in config files and on the command line.
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::French => "fr",
        }
    }

    /// Looks up `key` in this locale's catalog, falling back to the key itself.
    pub fn t<'a>(self, key: &'a str) -> &'a str {
        let catalog = match self {
            Self::English => ENGLISH,
            Self::French => FRENCH,
        };

        catalog
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(key, |(_, v)| *v)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => f.write_str("English"),
            Self::French => f.write_str("French"),
        }
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "fr" | "french" | "français" | "francais" => Ok(Self::French),
            _ => bail!(
                "Unsupported locale: '{s}'\n\n\
                 Supported locales: en (English), fr (French)"
            ),
        }
    }
}

/// Catalog keys referenced from code.
pub mod keys {
    pub const CHATBOT_INITIAL: &str = "chatbotInitial";
    pub const CHATBOT_HELP: &str = "chatbotHelp";
    pub const TOTAL_INCIDENTS: &str = "totalIncidents";
    pub const CRITICAL_INCIDENTS: &str = "criticalIncidents";
    pub const HIGH_SEVERITY: &str = "highSeverity";
    pub const INCIDENTS_BY_TYPE: &str = "incidentsByType";
    pub const SEVERITY_DISTRIBUTION: &str = "severityDistribution";
    pub const INCIDENTS_BY_MONTH: &str = "incidentsByMonth";
    pub const TOP_LOCATIONS: &str = "topLocations";
    pub const INCIDENT_CREATED: &str = "incidentCreated";
}

const ENGLISH: &[(&str, &str)] = &[
    (
        keys::CHATBOT_INITIAL,
        "Hi! I can help you filter incidents or answer questions. Try: 'Show critical incidents', \
         'How many incidents today?', 'What is the most common incident type?', \
         'Filter by location: Main Shaft', or 'Help'.",
    ),
    (
        keys::CHATBOT_HELP,
        "Available commands:\n\
         \u{2022} Filter by severity: \"Show critical/high/medium/low incidents\"\n\
         \u{2022} Filter by time: \"Show incidents from today/yesterday/this week/this month\"\n\
         \u{2022} Filter by location: \"Show incidents at Main Shaft\" or \"Filter by location: Tunnel B\"\n\
         \u{2022} Filter by type: \"Show equipment incidents\" or \"Filter by type: Injury\"\n\
         \u{2022} Statistics: \"How many incidents today?\" or \"Most common incident type?\"\n\
         \u{2022} Clear filters: \"Clear filters\" or \"Reset filters\"\n\
         \u{2022} General help: \"Help\" or \"What can you do?\"",
    ),
    (keys::TOTAL_INCIDENTS, "Total incidents"),
    (keys::CRITICAL_INCIDENTS, "Critical incidents"),
    (keys::HIGH_SEVERITY, "High severity"),
    (keys::INCIDENTS_BY_TYPE, "Incidents by Type"),
    (keys::SEVERITY_DISTRIBUTION, "Severity Distribution"),
    (keys::INCIDENTS_BY_MONTH, "Incidents by Month"),
    (keys::TOP_LOCATIONS, "Top Locations"),
    (keys::INCIDENT_CREATED, "Incident created!"),
];

const FRENCH: &[(&str, &str)] = &[
    (
        keys::CHATBOT_INITIAL,
        "Salut ! Je peux vous aider à filtrer les incidents ou à répondre à vos questions. \
         Essayez : 'Afficher les incidents critiques', 'Combien d'incidents aujourd'hui ?', \
         'Quel est le type d'incident le plus courant ?', 'Filtrer par lieu : Main Shaft' ou 'Aide'.",
    ),
    (
        keys::CHATBOT_HELP,
        "Commandes disponibles :\n\
         \u{2022} Filtrer par gravité : \"Afficher les incidents critiques/élevés/moyens/faibles\"\n\
         \u{2022} Filtrer par période : \"Afficher les incidents d'aujourd'hui/d'hier/cette semaine/ce mois\"\n\
         \u{2022} Filtrer par lieu : \"Afficher les incidents à Main Shaft\" ou \"Filtrer par lieu : Tunnel B\"\n\
         \u{2022} Filtrer par type : \"Afficher les incidents d'équipement\" ou \"Filtrer par type : Blessure\"\n\
         \u{2022} Statistiques : \"Combien d'incidents aujourd'hui ?\" ou \"Type d'incident le plus courant ?\"\n\
         \u{2022} Effacer les filtres : \"Effacer les filtres\" ou \"Réinitialiser les filtres\"\n\
         \u{2022} Aide générale : \"Aide\" ou \"Que peux-tu faire ?\"",
    ),
    (keys::TOTAL_INCIDENTS, "Incidents totaux"),
    (keys::CRITICAL_INCIDENTS, "Incidents critiques"),
    (keys::HIGH_SEVERITY, "Gravité élevée"),
    (keys::INCIDENTS_BY_TYPE, "Incidents par type"),
    (keys::SEVERITY_DISTRIBUTION, "Répartition par gravité"),
    (keys::INCIDENTS_BY_MONTH, "Incidents par mois"),
    (keys::TOP_LOCATIONS, "Lieux principaux"),
    (keys::INCIDENT_CREATED, "Incident créé !"),
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_per_locale() {
        assert_eq!(Locale::English.t(keys::TOTAL_INCIDENTS), "Total incidents");
        assert_eq!(Locale::French.t(keys::TOTAL_INCIDENTS), "Incidents totaux");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        assert_eq!(Locale::French.t("noSuchKey"), "noSuchKey");
    }

    #[test]
    fn test_catalogs_cover_same_keys() {
        for (key, _) in ENGLISH {
            assert!(
                FRENCH.iter().any(|(k, _)| k == key),
                "French catalog is missing {key}"
            );
        }
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!("fr".parse::<Locale>().unwrap(), Locale::French);
        assert_eq!("English".parse::<Locale>().unwrap(), Locale::English);
        assert!("de".parse::<Locale>().is_err());
    }
}
