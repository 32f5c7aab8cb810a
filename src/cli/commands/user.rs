//! `seamline user` command - account management

use clap::Subcommand;
use console::style;
use miette::{miette, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{open_store, request_context, require_role};
use crate::cli::table;
use crate::core::store::format_timestamp;
use crate::entities::Role;

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create an account
    Add(AddArgs),

    /// List all accounts
    List,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Login name, unique
    pub username: String,

    /// Role: admin, operator, inspector, or worker
    #[arg(long, short = 'r')]
    pub role: String,

    /// Brand the account is scoped to (operators)
    #[arg(long, short = 'b')]
    pub brand: Option<String>,
}

pub fn run(cmd: UserCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        UserCommands::Add(args) => run_add(args, global),
        UserCommands::List => run_list(global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[])?;

    let role: Role = args
        .role
        .parse()
        .map_err(|e: String| miette!("{}", e))?;
    let id = store
        .insert_user(&args.username, role, args.brand.as_deref(), ctx.now)
        .into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Created {} account '{}' (id {})",
            style("✓").green(),
            role,
            args.username,
            id
        );
    }
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[])?;

    let users = store.list_users().into_diagnostic()?;
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.username.clone(),
                u.role.to_string(),
                u.brand.clone().unwrap_or_else(|| "-".to_string()),
                format_timestamp(&u.created_at),
            ]
        })
        .collect();

    table::print_rows(
        global.format,
        &["ID", "Username", "Role", "Brand", "Created"],
        &rows,
        &users,
    )
}
