//! Best-effort activity logging
//!
//! Emitted after a successful core write, outside its transaction. A
//! failed log entry never fails the operation that triggered it.

use serde_json::Value;

use crate::core::context::RequestContext;
use crate::core::store::Store;
use crate::entities::ActivityAction;

/// Record an activity entry. Errors are deliberately dropped.
pub fn record(
    store: &mut Store,
    ctx: &RequestContext,
    action: ActivityAction,
    table_name: &str,
    record_id: i64,
    old_data: &Value,
    new_data: &Value,
) {
    let _ = store.insert_activity(
        ctx.actor,
        action,
        table_name,
        record_id,
        &old_data.to_string(),
        &new_data.to_string(),
        ctx.now,
    );
}
