//! `seamline activity` command - activity log viewing

use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{open_store, request_context, require_role, truncate_str};
use crate::cli::table;
use crate::core::store::format_timestamp;

#[derive(clap::Args, Debug)]
pub struct ActivityArgs {
    /// Maximum entries to show, newest first
    #[arg(long, short = 'n', default_value_t = 50)]
    pub limit: usize,
}

pub fn run(args: ActivityArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[])?;

    let entries = store.recent_activity(args.limit).into_diagnostic()?;
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.user_id.to_string(),
                e.action.to_string(),
                e.table_name.clone(),
                e.record_id.to_string(),
                truncate_str(&e.new_data, 40),
                format_timestamp(&e.created_at),
            ]
        })
        .collect();

    table::print_rows(
        global.format,
        &["ID", "User", "Action", "Table", "Record", "Change", "When"],
        &rows,
        &entries,
    )
}
