//! `seamline completions` command - shell completion scripts
//!
//! Writes a completion script for the requested shell to stdout; pipe it
//! to the place your shell loads completions from, e.g.
//! `seamline completions fish > ~/.config/fish/completions/seamline.fish`
//! or `source <(seamline completions bash)` in `~/.bashrc`.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "seamline", &mut io::stdout());
    Ok(())
}
