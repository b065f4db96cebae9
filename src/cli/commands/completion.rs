//! completion command - Generate shell completion scripts

use crate::cli::args::{Cli, Shell};
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, shells};

/// Write the completion script for `shell` to stdout.
pub fn completion(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let mut stdout = std::io::stdout();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, &name, &mut stdout),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, &name, &mut stdout),
        Shell::Fish => generate(shells::Fish, &mut cmd, &name, &mut stdout),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, &name, &mut stdout),
    }

    Ok(())
}
