//! Chat mode UI components.

use std::path::Path;

use super::session::{ASSISTANT, ChatMessage};
use crate::i18n::{Locale, keys};
use crate::interpreter::FilterPredicate;
use crate::ui::Style;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header() {
    println!(
        "{} {} - Incident Assistant",
        Style::header("minesafe"),
        Style::version(format!("v{VERSION}"))
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_reply(message: &ChatMessage) {
    println!(
        "{} {}",
        Style::assistant(format!("{}:", message.author.display_name)),
        message.text
    );
    println!();
}

pub fn print_history(messages: &[ChatMessage]) {
    println!("{}", Style::header("Conversation"));
    for message in messages {
        let author = if message.author == ASSISTANT {
            Style::assistant(message.author.display_name)
        } else {
            Style::value(message.author.display_name)
        };
        println!(
            "  {} {} {}",
            Style::secondary(message.timestamp.format("%H:%M:%S")),
            author,
            message.text
        );
    }
    println!();
}

pub fn print_filter(filter: Option<&FilterPredicate>) {
    match filter {
        Some(filter) => println!(
            "{} {}",
            Style::label("Active filter:"),
            Style::value(filter)
        ),
        None => println!("{}", Style::secondary("No active filter.")),
    }
}

pub fn print_config(locale: Locale, database: &Path) {
    println!("{}", Style::header("Configuration"));
    println!("  {}    {}", Style::label("locale"), Style::value(locale));
    println!(
        "  {}  {}",
        Style::label("database"),
        Style::secondary(database.display())
    );
    println!();
}

pub fn print_locale(locale: Locale) {
    println!(
        "{} {}  {}",
        Style::label("locale"),
        Style::value(locale),
        Style::hint("Usage: /locale <en|fr>")
    );
    println!();
}

pub fn print_locale_changed(locale: Locale) {
    println!(
        "{} Language set to {}",
        Style::success("✓"),
        Style::value(locale)
    );
    println!();
}

pub fn print_help(locale: Locale) {
    println!("{}", locale.t(keys::CHATBOT_HELP));
    println!();
    println!("{}", Style::header("Slash commands"));
    println!(
        "  {}   {}",
        Style::command("/config"),
        Style::secondary("Show current configuration")
    );
    println!(
        "  {}   {}",
        Style::command("/filter"),
        Style::secondary("Show the active filter and matching incidents")
    );
    println!(
        "  {}     {}",
        Style::command("/help"),
        Style::secondary("Show this help")
    );
    println!(
        "  {}  {}",
        Style::command("/history"),
        Style::secondary("Show the conversation so far")
    );
    println!(
        "  {}   {}",
        Style::command("/locale"),
        Style::secondary("Switch language (en, fr)")
    );
    println!(
        "  {}     {}",
        Style::command("/quit"),
        Style::secondary("Exit chat mode")
    );
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
