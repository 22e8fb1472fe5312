use anyhow::{Context, Result};
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use std::sync::{Arc, Mutex, PoisonError};

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::session::{ConversationSession, FilterConsumer, SearchHook};
use super::ui;
use crate::i18n::Locale;
use crate::incident::{Incident, IncidentStore};
use crate::interpreter::{FilterChange, FilterPredicate, Interpreter, SystemClock};
use crate::stats::StoreStats;
use crate::ui::{Spinner, render_incidents};

#[derive(Debug, Default)]
struct BoardState {
    active: Option<FilterPredicate>,
    changed: bool,
}

/// The incident list the chat drives: a snapshot of the store plus the
/// filter the assistant last applied.
#[derive(Debug)]
pub struct IncidentBoard {
    incidents: Vec<Incident>,
    state: Mutex<BoardState>,
}

impl IncidentBoard {
    pub fn new(incidents: Vec<Incident>) -> Self {
        Self {
            incidents,
            state: Mutex::new(BoardState::default()),
        }
    }

    pub fn active_filter(&self) -> Option<FilterPredicate> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .clone()
    }

    /// Incidents passing the active filter, newest first.
    pub fn visible(&self) -> Vec<&Incident> {
        match self.active_filter() {
            Some(filter) => filter.apply(&self.incidents),
            None => self.incidents.iter().collect(),
        }
    }

    pub fn render(&self) -> String {
        render_incidents(&self.visible())
    }

    /// Whether the filter changed since the last call.
    fn take_changed(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut state.changed)
    }
}

impl FilterConsumer for IncidentBoard {
    fn on_filter_change(&self, change: FilterChange<'_>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.active = match change {
            FilterChange::Apply(predicate) => Some(predicate.clone()),
            FilterChange::Clear => None,
        };
        state.changed = true;
    }
}

/// Records what the user typed, the way the dashboard's search box would.
struct SearchLog;

impl SearchHook for SearchLog {
    fn on_search(&self, raw_text: &str) {
        tracing::debug!(query = raw_text, "chat search");
    }
}

/// Interactive chat loop over a [`ConversationSession`].
pub struct ChatRepl {
    session: ConversationSession,
    board: Arc<IncidentBoard>,
    store: IncidentStore,
}

impl ChatRepl {
    /// Wires a session to `store`: the board gets a snapshot of its
    /// incidents and statistics questions are answered from it.
    pub fn new(store: IncidentStore, locale: Locale) -> Result<Self> {
        let interpreter =
            Arc::new(Interpreter::standard().context("Failed to build the command interpreter")?);
        let board = Arc::new(IncidentBoard::new(store.list()?));
        let stats = StoreStats::new(store.clone(), Arc::new(SystemClock));

        let session = ConversationSession::new(interpreter, locale)
            .with_stats(Arc::new(stats))
            .with_filter_consumer(board.clone())
            .with_search_hook(Arc::new(SearchLog));

        Ok(Self {
            session,
            board,
            store,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.session.toggle();
        ui::print_header();
        if let Some(welcome) = self.session.history().first() {
            ui::print_reply(welcome);
        }

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message("Ask about incidents, /help for commands, Ctrl+C to quit")
                .prompt();

            match input {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(cmd) => {
                        if !self.handle_command(cmd) {
                            break;
                        }
                    }
                    Input::Text(text) => self.reply_to(&text).await,
                },
                Err(
                    inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted,
                ) => {
                    println!();
                    break;
                }
                Err(e) => {
                    self.session.toggle();
                    return Err(e.into());
                }
            }
        }

        self.session.toggle();
        ui::print_goodbye();
        Ok(())
    }

    fn handle_command(&mut self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Config => ui::print_config(self.session.locale(), self.store.path()),
            SlashCommand::Filter => {
                ui::print_filter(self.board.active_filter().as_ref());
                print!("{}", self.board.render());
                println!();
            }
            SlashCommand::Help => ui::print_help(self.session.locale()),
            SlashCommand::History => ui::print_history(&self.session.history()),
            SlashCommand::Locale(None) => ui::print_locale(self.session.locale()),
            SlashCommand::Locale(Some(code)) => match code.parse::<Locale>() {
                Ok(locale) => {
                    self.session.set_locale(locale);
                    ui::print_locale_changed(locale);
                }
                Err(e) => ui::print_error(&e.to_string()),
            },
            SlashCommand::Quit => return false,
            SlashCommand::Unknown(cmd) => ui::print_error(&format!("Unknown command: /{cmd}")),
        }
        true
    }

    async fn reply_to(&self, text: &str) {
        let Some(pending) = self.session.send_user_message(text) else {
            return;
        };

        let spinner = Spinner::new("Thinking...");
        let reply = pending.await;
        spinner.stop();

        ui::print_reply(&reply);
        if self.board.take_changed() {
            print!("{}", self.board.render());
            println!();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::incident::{IncidentType, Severity};
    use crate::interpreter::{Clause, Field};

    fn incident(id: i64, location: &str, severity: Severity) -> Incident {
        Incident {
            id,
            date: "2025-09-15T16:00:00Z".parse().unwrap(),
            location: location.to_string(),
            incident_type: IncidentType::Equipment,
            severity,
            description: "Conveyor belt stalled".to_string(),
            reporter: "Shift Lead".to_string(),
        }
    }

    fn board() -> IncidentBoard {
        IncidentBoard::new(vec![
            incident(1, "Kolwezi", Severity::Critical),
            incident(2, "Likasi", Severity::Low),
            incident(3, "Kolwezi", Severity::High),
        ])
    }

    #[test]
    fn test_board_shows_everything_without_filter() {
        let board = board();
        assert_eq!(board.visible().len(), 3);
        assert!(board.active_filter().is_none());
    }

    #[test]
    fn test_board_applies_and_clears_filter() {
        let board = board();
        let filter = FilterPredicate::all(vec![Clause::contains(Field::Location, "kolwezi")]);

        board.on_filter_change(FilterChange::Apply(&filter));
        let ids: Vec<i64> = board.visible().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(board.take_changed());
        assert!(!board.take_changed());

        board.on_filter_change(FilterChange::Clear);
        assert_eq!(board.visible().len(), 3);
        assert!(board.take_changed());
    }

    #[test]
    fn test_board_render_uses_filter() {
        let board = board();
        let filter = FilterPredicate::all(vec![Clause::eq(Field::Severity, "low")]);

        board.on_filter_change(FilterChange::Apply(&filter));
        let rendered = board.render();

        assert!(rendered.contains("Likasi"));
        assert!(!rendered.contains("Kolwezi"));
    }

    #[tokio::test]
    async fn test_repl_wires_session_to_board() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = IncidentStore::open(temp_dir.path().join("incidents.db")).unwrap();
        store.seed_if_empty().unwrap();

        let repl = ChatRepl::new(store, Locale::English).unwrap();
        repl.session.send("Show critical incidents").await.unwrap();

        let visible = repl.board.visible();
        assert!(!visible.is_empty());
        assert!(visible.iter().all(|i| i.severity == Severity::Critical));
    }
}
