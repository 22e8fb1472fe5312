use anyhow::Result;
use clap::Parser;

use minesafe::cli::commands::{ask, chat, configure, incidents, stats};
use minesafe::cli::{Args, Command};
use minesafe::config::ResolveOptions;
use minesafe::output::{self, OutputConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || OutputConfig::default().no_color,
    });
    output::init_tracing(args.verbose);

    let overrides = ResolveOptions {
        locale: args.locale,
        database: args.database,
    };

    match args.command {
        Command::Chat => chat::run_chat(&overrides).await?,
        Command::Ask { text, json } => {
            let options = ask::AskOptions {
                text: text.join(" "),
                json,
            };
            ask::run_ask(options, &overrides).await?;
        }
        Command::Incidents { command } => incidents::run_incidents(command, &overrides)?,
        Command::Stats => stats::run_stats(&overrides)?,
        Command::Configure { show } => configure::run_configure(show)?,
    }

    Ok(())
}
