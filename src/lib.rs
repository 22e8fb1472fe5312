//! # minesafe - Mine-Site Safety Incident Log
//!
//! `minesafe` keeps a local log of safety incidents and ships an assistant
//! that understands short plain-language commands ("show critical incidents",
//! "filter by location: Main Shaft", "how many incidents today?").
//!
//! ## Quick Start
//!
//! ```bash
//! # Chat with the assistant
//! minesafe chat
//!
//! # One-shot question, machine readable
//! minesafe ask "show incidents from this week" --json
//!
//! # Record an incident
//! minesafe incidents add --location Kolwezi --type equipment --severity high \
//!     --description "Hoist brake failure" --reporter "Shift Lead"
//!
//! # Dashboard summary in French
//! minesafe stats --locale fr
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/minesafe/config.toml`:
//!
//! ```toml
//! [minesafe]
//! locale = "fr"
//! database = "/srv/minesafe/incidents.db"
//! ```
//!
//! ## Library use
//!
//! The [`interpreter::Interpreter`] and [`chat::ConversationSession`] have no
//! terminal dependencies and can be embedded directly:
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use minesafe::chat::ConversationSession;
//! use minesafe::i18n::Locale;
//! use minesafe::interpreter::Interpreter;
//!
//! let session = ConversationSession::new(Arc::new(Interpreter::standard()?), Locale::English);
//! if let Some(reply) = session.send("show critical incidents").await {
//!     println!("{}", reply.text);
//! }
//! # Ok(())
//! # }
//! ```

/// Conversation session and interactive chat mode.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// File system utilities.
pub mod fs;

/// Locale catalog (English, French).
pub mod i18n;

/// Incident model and `SQLite` store.
pub mod incident;

/// Plain-language command interpreter.
pub mod interpreter;

/// Global output configuration (quiet mode, colors, tracing).
pub mod output;

/// XDG-style path utilities for configuration and data.
pub mod paths;

/// Incident statistics for the assistant and the dashboard.
pub mod stats;

/// Terminal UI components (spinner, colors, tables).
pub mod ui;
