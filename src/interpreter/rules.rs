//! The ordered keyword table consulted after structural extraction and
//! statistical questions.

use chrono::TimeDelta;
use regex::Regex;

use super::clock::Clock;
use super::filter::{Clause, CommandResult, Field, FilterOutcome, FilterPredicate};
use crate::i18n::{Locale, keys};
use crate::incident::{IncidentType, Severity};

/// A date range relative to the moment of evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// From local midnight.
    Today,
    /// From 24 hours ago up to local midnight.
    Yesterday,
    /// The last seven days.
    ThisWeek,
    /// From the first of the current month.
    ThisMonth,
}

impl DateWindow {
    /// Clauses for this window, with "now" and calendar boundaries taken from `clock`.
    pub fn clauses(self, clock: &dyn Clock) -> Vec<Clause> {
        let now = clock.now();
        match self {
            Self::Today => vec![Clause::date_gte(clock.day_start(now))],
            // Rolling lookback with a calendar upper bound; not a calendar day.
            Self::Yesterday => vec![
                Clause::date_gte(now - TimeDelta::hours(24)),
                Clause::date_lt(clock.day_start(now)),
            ],
            Self::ThisWeek => vec![Clause::date_gte(now - TimeDelta::days(7))],
            Self::ThisMonth => vec![Clause::date_gte(clock.month_start(now))],
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::ThisWeek => "this week",
            Self::ThisMonth => "this month",
        }
    }
}

/// Reply text, either fixed or looked up in the active locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Fixed(&'static str),
    Localized(&'static str),
}

impl Reply {
    pub fn text(self, locale: Locale) -> String {
        match self {
            Self::Fixed(text) => text.to_string(),
            Self::Localized(key) => locale.t(key).to_string(),
        }
    }
}

/// What a matched rule does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Severity(Severity),
    Type(IncidentType),
    Clear,
    Window(DateWindow),
    Reply(Reply),
}

impl RuleAction {
    /// Builds the result for this action; date windows are read from `clock`.
    pub fn resolve(self, clock: &dyn Clock, locale: Locale) -> CommandResult {
        match self {
            Self::Severity(severity) => {
                let response = match severity {
                    Severity::Critical => "Showing critical incidents".to_string(),
                    other => format!(
                        "Showing {} severity incidents",
                        other.as_str().to_lowercase()
                    ),
                };
                CommandResult::new(
                    FilterOutcome::Apply(FilterPredicate::all(vec![Clause::eq(
                        Field::Severity,
                        severity.as_str(),
                    )])),
                    response,
                )
            }
            Self::Type(incident_type) => CommandResult::new(
                FilterOutcome::Apply(FilterPredicate::all(vec![Clause::eq(
                    Field::Type,
                    incident_type.as_str(),
                )])),
                format!("Showing {} incidents", incident_type.as_str().to_lowercase()),
            ),
            Self::Clear => CommandResult::new(FilterOutcome::Clear, "Filters cleared"),
            Self::Window(window) => CommandResult::new(
                FilterOutcome::Apply(FilterPredicate::all(window.clauses(clock))),
                format!("Showing incidents from {}", window.label()),
            ),
            Self::Reply(reply) => CommandResult::reply(reply.text(locale)),
        }
    }
}

/// One row of the keyword table.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: &'static str,
    pattern: Regex,
    pub action: RuleAction,
}

impl Rule {
    /// Compiles `pattern` case-insensitively.
    pub fn new(
        name: &'static str,
        pattern: &str,
        action: RuleAction,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(&format!("(?i){pattern}"))?,
            action,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Rules tested in declaration order; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The assistant's built-in table.
    pub fn standard() -> Result<Self, regex::Error> {
        use RuleAction::{Clear, Reply as Say, Severity as Sev, Type, Window};

        Ok(Self::new(vec![
            Rule::new(
                "critical",
                r"\b(?:critical|urgent|emergency)\b",
                Sev(Severity::Critical),
            )?,
            Rule::new("high", r"\b(?:high|severe)\b", Sev(Severity::High))?,
            Rule::new("medium", r"\b(?:medium|moderate)\b", Sev(Severity::Medium))?,
            Rule::new("low", r"\b(?:low|minor)\b", Sev(Severity::Low))?,
            Rule::new("clear", r"\b(?:clear|reset)\b|\bremove\s+filters?\b", Clear)?,
            Rule::new("today", r"\btoday\b", Window(DateWindow::Today))?,
            Rule::new("yesterday", r"\byesterday\b", Window(DateWindow::Yesterday))?,
            Rule::new("this week", r"\bthis\s+week\b", Window(DateWindow::ThisWeek))?,
            Rule::new(
                "this month",
                r"\bthis\s+month\b",
                Window(DateWindow::ThisMonth),
            )?,
            Rule::new("injury", r"\binjur(?:y|ies)\b", Type(IncidentType::Injury))?,
            Rule::new("equipment", r"\bequipment\b", Type(IncidentType::Equipment))?,
            Rule::new(
                "near-miss",
                r"\bnear[\s-]?miss(?:es)?\b",
                Type(IncidentType::NearMiss),
            )?,
            Rule::new(
                "environmental",
                r"\benvironmental\b",
                Type(IncidentType::Environmental),
            )?,
            Rule::new(
                "help",
                r"\b(?:help|aide)\b|\bwhat\s+can\s+you\s+do\b",
                Say(Reply::Localized(keys::CHATBOT_HELP)),
            )?,
            Rule::new(
                "greeting",
                r"\b(?:hi|hello|hey|good\s+(?:morning|afternoon|evening))\b",
                Say(Reply::Fixed(
                    "Hello! Ask me to filter incidents, or type 'help' to see what I can do.",
                )),
            )?,
            Rule::new(
                "thanks",
                r"\b(?:thanks|thank\s+you|thx)\b",
                Say(Reply::Fixed(
                    "You're welcome! Anything else you'd like to look at?",
                )),
            )?,
        ]))
    }

    /// First rule matching `text`, in declaration order.
    pub fn first_match(&self, text: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
