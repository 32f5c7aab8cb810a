//! `seamline work` command - rework logging against inspection slips

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use miette::{miette, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{open_store, request_context, require_role};
use crate::cli::table;
use crate::core::ledger::{self, WorkRevision, WorkSubmission};
use crate::core::pruner::{self, DEFAULT_RETENTION_DAYS};
use crate::core::Period;
use crate::entities::work_order::{join_extra_tasks, parse_extra_tasks};
use crate::entities::{Difficulty, Role};

#[derive(Subcommand, Debug)]
pub enum WorkCommands {
    /// Look up today's slip for a barcode
    Scan(ScanArgs),

    /// Log a work session against a slip
    Submit(SubmitArgs),

    /// Show a slip's rework progress
    Summary(SummaryArgs),

    /// List your own work history
    List(ListArgs),

    /// Edit one of your own work orders
    Edit(EditArgs),

    /// Delete your work orders older than the retention window
    Prune(PruneArgs),

    /// Show the daily work log across all workers
    Log(LogArgs),
}

#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    /// Scanned barcode
    pub barcode: String,
}

#[derive(clap::Args, Debug)]
pub struct SubmitArgs {
    /// Inspection slip id
    pub inspection: i64,

    /// Items repaired this session
    #[arg(long, short = 'r', default_value_t = 0)]
    pub repaired: u32,

    /// Additional defects found this session
    #[arg(long, short = 'd', default_value_t = 0)]
    pub defect: u32,

    /// Difficulty tier: refurb1, refurb2, or premium
    #[arg(long, short = 'D', default_value = "refurb1")]
    pub difficulty: String,

    /// Extra tasks performed, comma separated (steam, mend, wash)
    #[arg(long, short = 't', default_value = "")]
    pub tasks: String,
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Inspection slip id
    pub inspection: i64,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Period: today, yesterday, this-month, last-month, 7d, or 30d
    #[arg(long, short = 'p', default_value = "today")]
    pub period: String,

    /// Custom range start (YYYY-MM-DD); overrides --period with --to
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Custom range end (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Work order id
    pub work_order: i64,

    /// New repaired quantity
    #[arg(long, short = 'r')]
    pub repaired: Option<u32>,

    /// New additional defect quantity
    #[arg(long, short = 'd')]
    pub defect: Option<u32>,

    /// New difficulty tier
    #[arg(long, short = 'D')]
    pub difficulty: Option<String>,

    /// New extra task list, comma separated
    #[arg(long, short = 't')]
    pub tasks: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct PruneArgs {
    /// Retention window in days
    #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
    pub days: i64,
}

#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Day to show (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Maximum rows
    #[arg(long, short = 'n', default_value_t = 20)]
    pub limit: usize,
}

pub fn run(cmd: WorkCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        WorkCommands::Scan(args) => run_scan(args, global),
        WorkCommands::Submit(args) => run_submit(args, global),
        WorkCommands::Summary(args) => run_summary(args, global),
        WorkCommands::List(args) => run_list(args, global),
        WorkCommands::Edit(args) => run_edit(args, global),
        WorkCommands::Prune(args) => run_prune(args, global),
        WorkCommands::Log(args) => run_log(args, global),
    }
}

fn parse_difficulty(s: &str) -> Result<Difficulty> {
    s.parse().map_err(|e: String| miette!("{}", e))
}

fn run_scan(args: ScanArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Worker])?;

    let Some(slip) = store
        .latest_inspection_for_barcode(&args.barcode, ctx.now.date())
        .into_diagnostic()?
    else {
        return Err(miette!(
            "no slip recorded today for barcode {}",
            args.barcode
        ));
    };

    let summary = ledger::summarize(&store, slip.id).into_diagnostic()?;
    println!("{} slip {}", style("Found").green(), slip.id);
    println!("  barcode:   {}", slip.barcode);
    println!("  operator:  {}", slip.operator);
    println!("  status:    {}", slip.status);
    println!(
        "  counts:    {} normal / {} defect / {} pending (total {})",
        slip.normal_qty, slip.defect_qty, slip.pending_qty, slip.total_qty
    );
    println!(
        "  progress:  {} of {} consumed, {} remaining",
        summary.consumed, summary.total_qty, summary.remaining
    );
    Ok(())
}

fn run_submit(args: SubmitArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Worker])?;

    let submission = WorkSubmission {
        inspection_id: args.inspection,
        repaired_qty: args.repaired,
        additional_defect_qty: args.defect,
        difficulty: parse_difficulty(&args.difficulty)?,
        extra_tasks: parse_extra_tasks(&args.tasks).map_err(|e| miette!("{}", e))?,
    };
    let id = ledger::submit_work(&mut store, &ctx, &submission).into_diagnostic()?;

    if !global.quiet {
        let summary = ledger::summarize(&store, args.inspection).into_diagnostic()?;
        println!(
            "{} Logged work order {} ({} repaired, {} defect); {} of {} remaining on slip {}",
            style("✓").green(),
            id,
            args.repaired,
            args.defect,
            summary.remaining,
            summary.total_qty,
            args.inspection
        );
    }
    Ok(())
}

fn run_summary(args: SummaryArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Worker, Role::Inspector])?;

    let summary = ledger::summarize(&store, args.inspection).into_diagnostic()?;
    println!(
        "Slip {}: {} of {} consumed, {} remaining",
        summary.inspection_id, summary.consumed, summary.total_qty, summary.remaining
    );
    if !summary.per_worker.is_empty() {
        let names: std::collections::HashMap<i64, String> = store
            .list_users()
            .into_diagnostic()?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();
        let rows: Vec<Vec<String>> = summary
            .per_worker
            .iter()
            .map(|w| {
                vec![
                    names
                        .get(&w.worker_id)
                        .cloned()
                        .unwrap_or_else(|| w.worker_id.to_string()),
                    w.repaired.to_string(),
                    w.defect.to_string(),
                ]
            })
            .collect();
        println!();
        println!(
            "{}",
            table::render_table(&["Worker", "Repaired", "Defect"], &rows)
        );
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Worker])?;

    // History older than the retention window goes before it is shown
    let pruned =
        pruner::prune_older_than(&mut store, &ctx, DEFAULT_RETENTION_DAYS).into_diagnostic()?;
    if pruned > 0 && !global.quiet {
        eprintln!(
            "{} Pruned {} work orders past the {}-day window",
            style("!").yellow(),
            pruned,
            DEFAULT_RETENTION_DAYS
        );
    }

    let period = match (args.from, args.to) {
        (Some(start), Some(end)) => Period::Range { start, end },
        _ => args.period.parse().map_err(|e: String| miette!("{}", e))?,
    };
    let (start, end) = period.bounds(ctx.now.date()).into_diagnostic()?;

    let listings = store
        .work_orders_for_worker(ctx.actor, start, end)
        .into_diagnostic()?;

    let rows: Vec<Vec<String>> = listings
        .iter()
        .map(|w| {
            vec![
                w.id.to_string(),
                w.inspection_id.to_string(),
                w.product_name.clone(),
                w.repaired_qty.to_string(),
                w.additional_defect_qty.to_string(),
                w.difficulty.clone(),
                w.extra_tasks.clone(),
                w.created_at.clone(),
            ]
        })
        .collect();

    table::print_rows(
        global.format,
        &[
            "ID", "Slip", "Product", "Repaired", "Defect", "Difficulty", "Tasks", "Logged",
        ],
        &rows,
        &listings,
    )?;

    if !global.quiet && global.format == crate::cli::args::OutputFormat::Table {
        let repaired: u32 = listings.iter().map(|w| w.repaired_qty).sum();
        let defect: u32 = listings.iter().map(|w| w.additional_defect_qty).sum();
        println!(
            "\n{} sessions: {} repaired, {} additional defects",
            listings.len(),
            repaired,
            defect
        );
    }
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Worker])?;

    let Some(before) = store.work_order_by_id(args.work_order).into_diagnostic()? else {
        return Err(miette!("work order {} not found", args.work_order));
    };

    let difficulty = match args.difficulty.as_deref() {
        Some(s) => parse_difficulty(s)?,
        None => before.difficulty,
    };
    let extra_tasks = match args.tasks.as_deref() {
        Some(s) => parse_extra_tasks(s).map_err(|e| miette!("{}", e))?,
        None => before.extra_tasks.clone(),
    };
    let revision = WorkRevision {
        repaired_qty: args.repaired.unwrap_or(before.repaired_qty),
        additional_defect_qty: args.defect.unwrap_or(before.additional_defect_qty),
        difficulty,
        extra_tasks,
    };
    ledger::edit_work_order(&mut store, &ctx, args.work_order, &revision).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Updated work order {} ({} repaired, {} defect, {}{})",
            style("✓").green(),
            args.work_order,
            revision.repaired_qty,
            revision.additional_defect_qty,
            revision.difficulty,
            if revision.extra_tasks.is_empty() {
                String::new()
            } else {
                format!(", tasks: {}", join_extra_tasks(&revision.extra_tasks))
            }
        );
    }
    Ok(())
}

fn run_prune(args: PruneArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Worker])?;

    let pruned = pruner::prune_older_than(&mut store, &ctx, args.days).into_diagnostic()?;
    if !global.quiet {
        println!(
            "{} Pruned {} work orders older than {} days",
            style("✓").green(),
            pruned,
            args.days
        );
    }
    Ok(())
}

fn run_log(args: LogArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Worker, Role::Inspector])?;

    let date = args.date.unwrap_or_else(|| ctx.now.date());
    let rows_data = store.daily_work_log(date, args.limit).into_diagnostic()?;

    let rows: Vec<Vec<String>> = rows_data
        .iter()
        .map(|r| {
            vec![
                r.inspection_id.to_string(),
                r.worker.clone(),
                r.repaired_qty.to_string(),
                r.additional_defect_qty.to_string(),
                r.difficulty.clone(),
                r.extra_tasks.clone(),
                r.created_at.clone(),
            ]
        })
        .collect();

    table::print_rows(
        global.format,
        &["Slip", "Worker", "Repaired", "Defect", "Difficulty", "Tasks", "Logged"],
        &rows,
        &rows_data,
    )
}
