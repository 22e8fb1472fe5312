//! Statistical questions, matched independently of the keyword table.

use regex::Regex;

use crate::incident::IncidentType;
use crate::stats::{IncidentStats, StatsError};

pub const STATS_UNAVAILABLE: &str = "Statistics are not available in this session.";
pub const STATS_LOOKUP_FAILED: &str =
    "Sorry, I couldn't retrieve incident statistics right now. Please try again later.";
pub const TOTAL_INSTRUCTIONS: &str = "The total incident count is shown on the dashboard. \
     Run 'minesafe stats' for the full breakdown, or ask 'How many incidents today?'.";

/// Which statistic a question asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    TodayCount,
    MostCommonType,
    /// Answered with fixed instructions; no lookup.
    Total,
}

impl Question {
    pub const fn needs_stats(self) -> bool {
        !matches!(self, Self::Total)
    }

    /// Renders the answer from a completed lookup.
    pub fn answer(self, stats: Result<&IncidentStats, &StatsError>) -> String {
        let stats = match (self, stats) {
            (Self::Total, _) => return TOTAL_INSTRUCTIONS.to_string(),
            (_, Err(StatsError::Unavailable)) => return STATS_UNAVAILABLE.to_string(),
            (_, Err(StatsError::LookupFailed(_))) => return STATS_LOOKUP_FAILED.to_string(),
            (_, Ok(stats)) => stats,
        };

        match self {
            Self::TodayCount => match stats.today {
                1 => "There has been 1 incident reported today.".to_string(),
                n => format!("There have been {n} incidents reported today."),
            },
            Self::MostCommonType => stats.most_common_type.map_or_else(
                || "No incidents have been recorded yet.".to_string(),
                |t: IncidentType| format!("The most common incident type is {t}."),
            ),
            Self::Total => TOTAL_INSTRUCTIONS.to_string(),
        }
    }
}

/// Patterns for the statistical question families, tried in this order.
#[derive(Debug, Clone)]
pub struct QuestionMatcher {
    today_count: Regex,
    most_common: Regex,
    total: Regex,
}

impl QuestionMatcher {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            today_count: Regex::new(
                r"(?i)\bhow\s+many\b.*\btoday\b|\b(?:count|number)\s+of\s+incidents?\s+today\b",
            )?,
            most_common: Regex::new(r"(?i)\bmost\s+(?:common|frequent)\b")?,
            total: Regex::new(
                r"(?i)\btotal\s+(?:number\s+of\s+)?incidents?\b|\bincidents?\s+count\b|\bhow\s+many\s+incidents?\b",
            )?,
        })
    }

    pub fn classify(&self, text: &str) -> Option<Question> {
        if self.today_count.is_match(text) {
            Some(Question::TodayCount)
        } else if self.most_common.is_match(text) {
            Some(Question::MostCommonType)
        } else if self.total.is_match(text) {
            Some(Question::Total)
        } else {
            None
        }
    }
}
