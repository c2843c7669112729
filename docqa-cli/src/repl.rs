//! Interactive question loop over a [`DocumentSession`].

use std::path::{Path, PathBuf};

use anyhow::Result;
use docqa_rag::{DocumentSession, FileExtractor};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::render;

const HELP: &str = "Commands: :load <path>, :reset, :info, :help, :quit";

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    Load(PathBuf),
    Reset,
    Info,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.strip_prefix(':') else {
            return Self::Ask(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        match name {
            "load" | "l" if !arg.is_empty() => Self::Load(PathBuf::from(arg)),
            "reset" | "clear" => Self::Reset,
            "info" => Self::Info,
            "help" | "h" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

async fn load(session: &DocumentSession, path: &Path) {
    match session.load_file(path, &FileExtractor::new()).await {
        Ok(doc) => println!("Loaded {}", render::document_info(Some(&*doc))),
        Err(e) => println!("{}", render::error(&e)),
    }
}

/// Read questions until `:quit` or end of input.
pub async fn run(session: &DocumentSession, initial: Option<&Path>) -> Result<()> {
    println!("docqa interactive session");
    println!("{HELP}");
    if let Some(path) = initial {
        load(session, path).await;
    }
    println!();

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("? ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let command = ReplCommand::parse(&line);
        debug!(?command, "repl input");

        match command {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => break,
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Info => {
                let current = session.current().await;
                println!("{}", render::document_info(current.as_deref()));
            }
            ReplCommand::Reset => {
                session.reset().await;
                println!("Document cleared.");
            }
            ReplCommand::Load(path) => load(session, &path).await,
            ReplCommand::Unknown(input) => {
                println!("Unknown command: {input}");
                println!("{HELP}");
            }
            ReplCommand::Ask(question) => {
                if let Err(e) = editor.add_history_entry(question.as_str()) {
                    debug!(error = %e, "could not record history entry");
                }
                match session.ask(&question).await {
                    Ok(answer) => print!("{}", render::answer(&answer)),
                    Err(e) => println!("{}", render::error(&e)),
                }
            }
        }
        println!();
    }

    println!("Goodbye!");
    Ok(())
}
