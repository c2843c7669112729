//! Command-line front end for `docqa-rag`.
//!
//! The `docqa` binary indexes a text or PDF document with an Ollama embedding model and
//! answers questions about it with an Ollama chat model, either once (`ask`, `search`) or
//! interactively (`chat`).

pub mod cli;
pub mod commands;
pub mod render;
pub mod repl;

use std::sync::Arc;

use anyhow::Result;
use docqa_rag::DocumentSession;

pub use cli::{BackendArgs, Cli, Command};

/// Execute a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let pipeline = cli.backend.pipeline()?;
    match cli.command {
        Command::Ask { file, question } => commands::ask(pipeline, &file, &question).await,
        Command::Search { file, query } => commands::search(pipeline, &file, &query).await,
        Command::Chat { file } => {
            let session = DocumentSession::new(Arc::new(pipeline));
            repl::run(&session, file.as_deref()).await
        }
    }
}
