//! The assistant's conversation: ordered transcript, turn sequencing and
//! the interactive REPL built on top of it.

/// Slash command parsing and autocomplete.
pub mod command;
mod repl;
mod session;
mod ui;

pub use repl::{ChatRepl, IncidentBoard};
pub use session::{
    ASSISTANT, Author, ChatMessage, ConversationSession, FilterConsumer, GENERIC_APOLOGY,
    PanelState, PendingReply, SearchHook, USER,
};
