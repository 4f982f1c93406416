use std::io::Write;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::{Cli, CompletionShell};
use crate::error::CliError;

const BIN_NAME: &str = "notesync";

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Self::Bash,
            CompletionShell::Zsh => Self::Zsh,
            CompletionShell::Fish => Self::Fish,
        }
    }
}

pub fn completion_script(shell: CompletionShell) -> Vec<u8> {
    let mut script = Vec::new();
    clap_complete::generate(
        Shell::from(shell),
        &mut Cli::command(),
        BIN_NAME,
        &mut script,
    );
    script
}

/// Write the script to `output_path`, or to `out` when no path is given.
pub fn run_completions<W: Write>(
    shell: CompletionShell,
    output_path: Option<&Path>,
    out: &mut W,
) -> Result<(), CliError> {
    let script = completion_script(shell);
    match output_path {
        Some(path) => {
            std::fs::write(path, &script)?;
            writeln!(out, "{}", path.display())?;
        }
        None => out.write_all(&script)?,
    }
    Ok(())
}
