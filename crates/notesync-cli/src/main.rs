//! notesync CLI - keep short notes in step with a hosted notes collection
//!
//! Quick capture, listing, and a live view of the collection from the terminal.

mod cli;
mod commands;
mod error;
mod terminal;
#[cfg(test)]
mod tests;

use std::io;

use clap::{CommandFactory, Parser};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::{open_collection, read_piped_stdin, resolve_note_content};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::list::run_list;
use crate::commands::watch::run_watch;
use crate::error::CliError;
use crate::terminal::{AlwaysConfirm, StdinPrompt};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notesync=info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Some(Commands::Add { text }) => {
            let text = resolve_note_content(&text)?;
            run_add(open_collection(config_path)?, &text, &mut stdout).await?;
        }
        Some(Commands::List { limit, json }) => {
            run_list(open_collection(config_path)?, limit, json, &mut stdout).await?;
        }
        Some(Commands::Delete { id, yes }) => {
            let collection = open_collection(config_path)?;
            if yes {
                run_delete(collection, &id, AlwaysConfirm, &mut stdout).await?;
            } else {
                run_delete(collection, &id, StdinPrompt, &mut stdout).await?;
            }
        }
        Some(Commands::Watch) => {
            let input = BufReader::new(tokio::io::stdin());
            run_watch(open_collection(config_path)?, input, &mut stdout).await?;
        }
        Some(Commands::Export { format, output }) => {
            run_export(
                open_collection(config_path)?,
                format,
                output.as_deref(),
                &mut stdout,
            )
            .await?;
        }
        Some(Commands::Config { command }) => run_config(command, config_path, &mut stdout)?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref(), &mut stdout)?;
        }
        None => {
            // Quick capture mode: notesync "my note"
            let text = if cli.note.is_empty() {
                read_piped_stdin()?
            } else {
                Some(resolve_note_content(&cli.note)?)
            };
            match text {
                Some(text) => run_add(open_collection(config_path)?, &text, &mut stdout).await?,
                None => {
                    Cli::command().print_help().map_err(CliError::Io)?;
                    println!();
                }
            }
        }
    }

    Ok(())
}
