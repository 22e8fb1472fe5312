use anyhow::Result;

use super::{load_config, open_store};
use crate::chat::ChatRepl;
use crate::config::ResolveOptions;

pub async fn run_chat(options: &ResolveOptions) -> Result<()> {
    let config = load_config(options)?;
    let store = open_store(&config)?;

    let mut repl = ChatRepl::new(store, config.locale)?;
    repl.run().await
}
