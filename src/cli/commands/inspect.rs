//! `seamline inspect` command - inspection slip management

use clap::Subcommand;
use console::style;
use miette::{miette, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{open_store, request_context, require_role, truncate_str};
use crate::cli::table;
use crate::core::recorder::{self, InspectionEntry};
use crate::core::store::InspectionFilter;
use crate::entities::{InspectionStatus, Role};

#[derive(Subcommand, Debug)]
pub enum InspectCommands {
    /// Record an inspection slip
    Record(RecordArgs),

    /// List slips with filters
    List(ListArgs),

    /// Revise a slip's status or comment
    Revise(ReviseArgs),

    /// Delete slips by id
    Delete(DeleteArgs),

    /// List the distinct operator names on record
    Operators,
}

#[derive(clap::Args, Debug)]
pub struct RecordArgs {
    /// Product id
    pub product: i64,

    /// Barcode of the inspected SKU
    #[arg(long, short = 'B')]
    pub barcode: String,

    /// Operator (brand) name the slip is recorded under
    #[arg(long, short = 'o')]
    pub operator: String,

    /// Items found in sellable condition
    #[arg(long, short = 'n', default_value_t = 0)]
    pub normal: u32,

    /// Items found defective
    #[arg(long, short = 'd', default_value_t = 0)]
    pub defect: u32,

    /// Items needing a second look
    #[arg(long, short = 'p', default_value_t = 0)]
    pub pending: u32,

    /// Free-text note
    #[arg(long, short = 'c')]
    pub comment: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by operator name
    #[arg(long, short = 'o')]
    pub operator: Option<String>,

    /// Filter by status: normal, defective, or pending
    #[arg(long, short = 's')]
    pub status: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ReviseArgs {
    /// Slip id
    pub inspection: i64,

    /// New status: normal, defective, or pending
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// New comment
    #[arg(long, short = 'c')]
    pub comment: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Slip ids
    #[arg(required = true)]
    pub inspections: Vec<i64>,
}

pub fn run(cmd: InspectCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        InspectCommands::Record(args) => run_record(args, global),
        InspectCommands::List(args) => run_list(args, global),
        InspectCommands::Revise(args) => run_revise(args, global),
        InspectCommands::Delete(args) => run_delete(args, global),
        InspectCommands::Operators => run_operators(global),
    }
}

fn parse_status(s: &str) -> Result<InspectionStatus> {
    s.parse().map_err(|e: String| miette!("{}", e))
}

fn run_record(args: RecordArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Inspector])?;

    let entry = InspectionEntry {
        product_id: args.product,
        barcode: args.barcode,
        operator: args.operator,
        normal_qty: args.normal,
        defect_qty: args.defect,
        pending_qty: args.pending,
        comment: args.comment,
    };
    let id = recorder::record_inspection(&mut store, &ctx, &entry).into_diagnostic()?;

    if !global.quiet {
        let total =
            u64::from(args.normal) + u64::from(args.defect) + u64::from(args.pending);
        println!(
            "{} Recorded slip {} ({} items: {} normal, {} defect, {} pending)",
            style("✓").green(),
            id,
            total,
            args.normal,
            args.defect,
            args.pending
        );
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Inspector])?;

    let status = args.status.as_deref().map(parse_status).transpose()?;
    let filter = InspectionFilter {
        operator: args.operator,
        status,
    };
    let listings = store.list_inspections(&filter).into_diagnostic()?;

    let rows: Vec<Vec<String>> = listings
        .iter()
        .map(|l| {
            vec![
                l.id.to_string(),
                l.inspected_at.clone(),
                l.status.to_string(),
                l.product_name.clone(),
                l.barcode.clone(),
                l.operator.clone(),
                l.normal_qty.to_string(),
                l.defect_qty.to_string(),
                l.pending_qty.to_string(),
                l.total_qty.to_string(),
                truncate_str(l.comment.as_deref().unwrap_or("-"), 30),
            ]
        })
        .collect();

    table::print_rows(
        global.format,
        &[
            "ID", "Inspected", "Status", "Product", "Barcode", "Operator",
            "Normal", "Defect", "Pending", "Total", "Comment",
        ],
        &rows,
        &listings,
    )?;
    if !global.quiet && global.format == crate::cli::args::OutputFormat::Table {
        println!("\n{} slips", listings.len());
    }
    Ok(())
}

fn run_revise(args: ReviseArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Inspector])?;

    if args.status.is_none() && args.comment.is_none() {
        return Err(miette!("nothing to revise: pass --status and/or --comment"));
    }
    let status = args.status.as_deref().map(parse_status).transpose()?;
    recorder::revise_inspection(&mut store, &ctx, args.inspection, status, args.comment)
        .into_diagnostic()?;

    if !global.quiet {
        println!("{} Revised slip {}", style("✓").green(), args.inspection);
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Inspector])?;

    let deleted =
        recorder::delete_inspections(&mut store, &ctx, &args.inspections).into_diagnostic()?;

    if !global.quiet {
        println!("{} Deleted {} slips", style("✓").green(), deleted);
    }
    Ok(())
}

fn run_operators(global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Inspector])?;

    for name in store.inspection_operators().into_diagnostic()? {
        println!("{}", name);
    }
    Ok(())
}
