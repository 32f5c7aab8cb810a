//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    activity::ActivityArgs,
    completions::CompletionsArgs,
    init::InitArgs,
    inspect::InspectCommands,
    product::ProductCommands,
    user::UserCommands,
    work::WorkCommands,
};

#[derive(Parser)]
#[command(name = "seamline")]
#[command(author, version, about = "Seamline garment inspection tracker")]
#[command(
    long_about = "Track garment inspection results and rework orders for a resale operation: \
                  inspectors record per-SKU quantities, workers log rework against the slips, \
                  and the ledger keeps cumulative rework within what was inspected."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Database file (default: per-user data directory)
    #[arg(long, global = true, env = "SEAMLINE_DB")]
    pub db: Option<PathBuf>,

    /// Acting user id; role checks are applied to this account
    #[arg(long, short = 'u', global = true, env = "SEAMLINE_USER")]
    pub user: Option<i64>,

    /// Output format for list commands
    #[arg(long, short = 'f', global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and seed the default accounts
    Init(InitArgs),

    /// User account management (admin)
    #[command(subcommand)]
    User(UserCommands),

    /// Product, SKU, and image-record management
    #[command(subcommand)]
    Product(ProductCommands),

    /// Inspection slip management (inspector)
    #[command(subcommand)]
    Inspect(InspectCommands),

    /// Rework logging against inspection slips (worker)
    #[command(subcommand)]
    Work(WorkCommands),

    /// Show the activity log (admin)
    Activity(ActivityArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown-style table
    #[default]
    Table,
    /// JSON (for programming)
    Json,
    /// CSV (for spreadsheets)
    Csv,
}
