//! `seamline init` command - create the database and seed accounts

use chrono::Local;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::core::store::Store;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Skip seeding the default accounts
    #[arg(long)]
    pub no_seed: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = match &global.db {
        Some(p) => p.clone(),
        None => Store::default_path(),
    };
    let mut store = Store::open(&path).into_diagnostic()?;

    let seeded = if args.no_seed {
        0
    } else {
        store
            .seed_default_users(Local::now().naive_local())
            .into_diagnostic()?
    };

    if !global.quiet {
        println!(
            "{} Initialized database at {}",
            style("✓").green(),
            path.display()
        );
        if seeded > 0 {
            println!(
                "{} Seeded {} default accounts (admin, op1, insp1, worker1)",
                style("✓").green(),
                seeded
            );
        }
    }
    Ok(())
}
