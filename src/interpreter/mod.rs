//! Turns free-text chat input into a filter change or a canned answer.
//!
//! Evaluation order, first match wins:
//!
//! 1. location phrase (`at`, `in`, `from`, `location`)
//! 2. type phrase (`type`, `kind of`, `category`)
//! 3. statistical questions (today's count, most common type, totals)
//! 4. the keyword [`RuleTable`]
//! 5. a "not understood" fallback
//!
//! Structural rules run first because the keyword patterns overlap with
//! them: "incidents at Main Shaft today" is a location filter, not a date
//! filter.

mod clock;
mod extract;
mod filter;
mod questions;
mod rules;

use std::sync::Arc;

pub use clock::{Clock, FixedClock, SystemClock, start_of_day, start_of_month};
pub use extract::PhraseExtractor;
pub use filter::{
    Clause, CommandResult, Field, FilterChange, FilterOutcome, FilterPredicate, FilterValue,
    Logic, Operator,
};
pub use questions::{
    Question, QuestionMatcher, STATS_LOOKUP_FAILED, STATS_UNAVAILABLE, TOTAL_INSTRUCTIONS,
};
pub use rules::{DateWindow, Reply, Rule, RuleAction, RuleTable};

use crate::i18n::Locale;
use crate::stats::{self, StatsProvider};

pub const NOT_UNDERSTOOD: &str = "I didn't understand that command. Try: 'Show critical incidents', \
     'Filter by location: Main Shaft', or 'Clear filters'.";

/// The command interpreter. Immutable once built; share it behind an `Arc`.
pub struct Interpreter {
    location: PhraseExtractor,
    incident_type: PhraseExtractor,
    questions: QuestionMatcher,
    rules: RuleTable,
    clock: Arc<dyn Clock>,
}

impl Interpreter {
    pub fn new(rules: RuleTable, clock: Arc<dyn Clock>) -> Result<Self, regex::Error> {
        Ok(Self {
            location: PhraseExtractor::location()?,
            incident_type: PhraseExtractor::incident_type()?,
            questions: QuestionMatcher::new()?,
            rules,
            clock,
        })
    }

    /// The built-in rule table on the system clock.
    pub fn standard() -> Result<Self, regex::Error> {
        Self::new(RuleTable::standard()?, Arc::new(SystemClock))
    }

    /// Interprets one utterance. Never fails: statistics errors become reply text.
    pub async fn interpret(
        &self,
        text: &str,
        stats: Option<&dyn StatsProvider>,
        locale: Locale,
    ) -> CommandResult {
        let text = text.trim();

        if let Some(location) = self.location.extract(text) {
            tracing::debug!(%location, "matched location phrase");
            return CommandResult::new(
                FilterOutcome::Apply(FilterPredicate::all(vec![Clause::contains(
                    Field::Location,
                    location.as_str(),
                )])),
                format!("Showing incidents at {location}"),
            );
        }

        if let Some(incident_type) = self.incident_type.extract(text) {
            tracing::debug!(%incident_type, "matched type phrase");
            return CommandResult::new(
                FilterOutcome::Apply(FilterPredicate::all(vec![Clause::contains(
                    Field::Type,
                    incident_type.as_str(),
                )])),
                format!("Showing {incident_type} incidents"),
            );
        }

        if let Some(question) = self.questions.classify(text) {
            tracing::debug!(?question, "matched statistics question");
            if !question.needs_stats() {
                return CommandResult::reply(TOTAL_INSTRUCTIONS);
            }
            let looked_up = stats::lookup(stats).await;
            if let Err(err) = &looked_up {
                tracing::debug!(error = ?err, "statistics lookup did not complete");
            }
            return CommandResult::reply(question.answer(looked_up.as_ref()));
        }

        if let Some(rule) = self.rules.first_match(text) {
            tracing::debug!(rule = rule.name, "matched keyword rule");
            return rule.action.resolve(self.clock.as_ref(), locale);
        }

        tracing::debug!("no rule matched");
        CommandResult::new(FilterOutcome::NotUnderstood, NOT_UNDERSTOOD)
    }
}
