//! One-shot interpretation: `minesafe ask "show critical incidents"`.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

use super::{load_config, open_store};
use crate::config::ResolveOptions;
use crate::incident::Incident;
use crate::interpreter::{CommandResult, FilterOutcome, Interpreter, SystemClock};
use crate::stats::StoreStats;
use crate::ui::{Style, render_incidents};

pub struct AskOptions {
    pub text: String,
    pub json: bool,
}

#[derive(Serialize)]
struct AskOutput<'a> {
    #[serde(flatten)]
    result: &'a CommandResult,
    /// Incidents matching an applied filter; absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    incidents: Option<Vec<&'a Incident>>,
}

pub async fn run_ask(options: AskOptions, overrides: &ResolveOptions) -> Result<()> {
    let config = load_config(overrides)?;
    let store = open_store(&config)?;

    let interpreter = Interpreter::standard().context("Failed to build the command interpreter")?;
    let stats = StoreStats::new(store.clone(), Arc::new(SystemClock));

    let result = interpreter
        .interpret(&options.text, Some(&stats), config.locale)
        .await;

    let incidents = store.list()?;
    let matching = match &result.filter {
        FilterOutcome::Apply(predicate) => Some(predicate.apply(&incidents)),
        FilterOutcome::Clear => Some(incidents.iter().collect()),
        FilterOutcome::NoOpinion | FilterOutcome::NotUnderstood => None,
    };

    if options.json {
        let output = AskOutput {
            result: &result,
            incidents: matching,
        };
        let json = serde_json::to_string_pretty(&output).context("Failed to serialize result")?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", result.response_text);
    if let FilterOutcome::Apply(predicate) = &result.filter {
        println!("{} {}", Style::label("filter:"), Style::value(predicate));
    }
    if let Some(matching) = matching {
        println!();
        print!("{}", render_incidents(&matching));
    }

    Ok(())
}
