//! Retention pruner
//!
//! Bounds ledger history growth per worker. Runs before a worker's own
//! history is read for display, and never as a side effect of submit or
//! summarize. Deletion is permanent.

use chrono::Duration;
use rusqlite::params;

use crate::core::context::RequestContext;
use crate::core::error::{CoreError, Result};
use crate::core::store::{format_date, Store};

/// Default retention window in days (about three months)
pub const DEFAULT_RETENTION_DAYS: i64 = 90;

/// Delete the calling worker's work orders created strictly before
/// `now - window_days`. Idempotent; other workers' rows are never touched.
/// Returns the number of rows removed.
///
/// A negative window would push the cutoff into the future and sweep up
/// rows created today, so it is rejected.
pub fn prune_older_than(
    store: &mut Store,
    ctx: &RequestContext,
    window_days: i64,
) -> Result<usize> {
    if window_days < 0 {
        return Err(CoreError::InvalidInput(format!(
            "retention window must not be negative (got {})",
            window_days
        )));
    }
    let cutoff = ctx.now.date() - Duration::days(window_days);
    let deleted = store.conn().execute(
        "DELETE FROM work_orders WHERE worker_id = ?1 AND DATE(created_at) < DATE(?2)",
        params![ctx.actor, format_date(&cutoff)],
    )?;
    Ok(deleted)
}
