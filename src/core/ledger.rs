//! Work-order ledger
//!
//! Tracks how much of an inspection slip's total has been consumed by
//! rework across workers and sessions, and refuses to over-commit. The
//! consumed figure is recomputed from stored rows on every check; work
//! order counts per slip are bounded by the physical item count, so the
//! aggregate stays cheap.
//!
//! Every quota-checked write runs inside an immediate transaction: the
//! writer lock is held from before the aggregate read until after the
//! insert or update, so two concurrent submitters cannot both see the same
//! headroom.

use rusqlite::{params, OptionalExtension};
use serde::Serialize;
use serde_json::json;

use crate::core::audit;
use crate::core::context::RequestContext;
use crate::core::error::{CoreError, Result};
use crate::core::store::{format_timestamp, Store};
use crate::entities::work_order::join_extra_tasks;
use crate::entities::{ActivityAction, Difficulty, ExtraTask};

/// Input for one work session
#[derive(Debug, Clone)]
pub struct WorkSubmission {
    pub inspection_id: i64,
    pub repaired_qty: u32,
    pub additional_defect_qty: u32,
    pub difficulty: Difficulty,
    pub extra_tasks: Vec<ExtraTask>,
}

/// Replacement values for an owned work order's editable fields
#[derive(Debug, Clone)]
pub struct WorkRevision {
    pub repaired_qty: u32,
    pub additional_defect_qty: u32,
    pub difficulty: Difficulty,
    pub extra_tasks: Vec<ExtraTask>,
}

/// Per-worker share of a slip's consumed total
#[derive(Debug, Clone, Serialize)]
pub struct WorkerTally {
    pub worker_id: i64,
    pub repaired: i64,
    pub defect: i64,
}

/// Progress snapshot for one inspection slip
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSummary {
    pub inspection_id: i64,
    pub total_qty: i64,
    pub consumed: i64,
    /// May be negative after a slip's total was revised below its already
    /// recorded rework; reported as-is, never an error
    pub remaining: i64,
    pub per_worker: Vec<WorkerTally>,
}

fn consumed_for(
    conn: &rusqlite::Connection,
    inspection_id: i64,
) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COALESCE(SUM(repaired_qty), 0) + COALESCE(SUM(additional_defect_qty), 0)
           FROM work_orders WHERE inspection_id = ?1",
        params![inspection_id],
        |row| row.get(0),
    )
}

fn total_for(
    conn: &rusqlite::Connection,
    inspection_id: i64,
) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT total_qty FROM inspection_results WHERE id = ?1",
        params![inspection_id],
        |row| row.get(0),
    )
    .optional()
}

/// Append one work session against a slip. At least one unit of progress
/// must be recorded, and the slip's total may never be over-committed.
pub fn submit_work(
    store: &mut Store,
    ctx: &RequestContext,
    submission: &WorkSubmission,
) -> Result<i64> {
    if submission.repaired_qty == 0 && submission.additional_defect_qty == 0 {
        return Err(CoreError::InvalidInput(
            "repaired and additional defect quantities are both zero".to_string(),
        ));
    }

    let id;
    {
        let tx = store.tx()?;

        let Some(total) = total_for(&tx, submission.inspection_id)? else {
            return Err(CoreError::NotFound {
                entity: "inspection",
                id: submission.inspection_id,
            });
        };
        let consumed = consumed_for(&tx, submission.inspection_id)?;
        let requested =
            i64::from(submission.repaired_qty) + i64::from(submission.additional_defect_qty);
        if consumed + requested > total {
            return Err(CoreError::QuotaExceeded {
                requested,
                remaining: total - consumed,
                total,
            });
        }

        tx.execute(
            "INSERT INTO work_orders
               (inspection_id, worker_id, repaired_qty, additional_defect_qty,
                repaired_approved, difficulty, extra_tasks, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7)",
            params![
                submission.inspection_id,
                ctx.actor,
                submission.repaired_qty,
                submission.additional_defect_qty,
                submission.difficulty.to_string(),
                join_extra_tasks(&submission.extra_tasks),
                format_timestamp(&ctx.now),
            ],
        )?;
        id = tx.last_insert_rowid();
        tx.commit()?;
    }

    audit::record(
        store,
        ctx,
        ActivityAction::Create,
        "work_orders",
        id,
        &json!({}),
        &json!({
            "inspection_id": submission.inspection_id,
            "worker_id": ctx.actor,
            "repaired_qty": submission.repaired_qty,
            "additional_defect_qty": submission.additional_defect_qty,
            "difficulty": submission.difficulty,
            "extra_tasks": submission.extra_tasks,
        }),
    );

    Ok(id)
}

/// Revise an owned work order. The quota is rechecked with this row's old
/// contribution subtracted out first, so an edit cannot sneak past the
/// total relative to everyone else's rows. On any failure the stored row
/// is left exactly as it was.
pub fn edit_work_order(
    store: &mut Store,
    ctx: &RequestContext,
    work_order_id: i64,
    revision: &WorkRevision,
) -> Result<()> {
    let before;
    {
        let tx = store.tx()?;

        let row: Option<(i64, i64, i64, i64, String, String)> = tx
            .query_row(
                "SELECT inspection_id, worker_id, repaired_qty, additional_defect_qty,
                        difficulty, extra_tasks
                   FROM work_orders WHERE id = ?1",
                params![work_order_id],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                },
            )
            .optional()?;
        let Some((inspection_id, worker_id, old_repaired, old_defect, old_difficulty, old_extra)) =
            row
        else {
            return Err(CoreError::NotFound {
                entity: "work order",
                id: work_order_id,
            });
        };
        if worker_id != ctx.actor {
            return Err(CoreError::Forbidden {
                work_order: work_order_id,
            });
        }

        let Some(total) = total_for(&tx, inspection_id)? else {
            return Err(CoreError::NotFound {
                entity: "inspection",
                id: inspection_id,
            });
        };
        let consumed_others =
            consumed_for(&tx, inspection_id)? - old_repaired - old_defect;
        let requested =
            i64::from(revision.repaired_qty) + i64::from(revision.additional_defect_qty);
        if consumed_others + requested > total {
            return Err(CoreError::QuotaExceeded {
                requested,
                remaining: total - consumed_others,
                total,
            });
        }

        tx.execute(
            "UPDATE work_orders
                SET repaired_qty = ?1, additional_defect_qty = ?2,
                    difficulty = ?3, extra_tasks = ?4
              WHERE id = ?5",
            params![
                revision.repaired_qty,
                revision.additional_defect_qty,
                revision.difficulty.to_string(),
                join_extra_tasks(&revision.extra_tasks),
                work_order_id,
            ],
        )?;
        tx.commit()?;

        before = json!({
            "repaired_qty": old_repaired,
            "additional_defect_qty": old_defect,
            "difficulty": old_difficulty,
            "extra_tasks": old_extra,
        });
    }

    audit::record(
        store,
        ctx,
        ActivityAction::Update,
        "work_orders",
        work_order_id,
        &before,
        &json!({
            "repaired_qty": revision.repaired_qty,
            "additional_defect_qty": revision.additional_defect_qty,
            "difficulty": revision.difficulty,
            "extra_tasks": revision.extra_tasks,
        }),
    );

    Ok(())
}

/// Progress snapshot for a slip: totals, headroom, and per-worker tallies
pub fn summarize(store: &Store, inspection_id: i64) -> Result<LedgerSummary> {
    let Some(total_qty) = total_for(store.conn(), inspection_id)? else {
        return Err(CoreError::NotFound {
            entity: "inspection",
            id: inspection_id,
        });
    };
    let consumed = consumed_for(store.conn(), inspection_id)?;

    let mut stmt = store.conn().prepare(
        "SELECT worker_id,
                COALESCE(SUM(repaired_qty), 0),
                COALESCE(SUM(additional_defect_qty), 0)
           FROM work_orders
          WHERE inspection_id = ?1
          GROUP BY worker_id
          ORDER BY worker_id",
    )?;
    let per_worker = stmt
        .query_map(params![inspection_id], |row| {
            Ok(WorkerTally {
                worker_id: row.get(0)?,
                repaired: row.get(1)?,
                defect: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(LedgerSummary {
        inspection_id,
        total_qty,
        consumed,
        remaining: total_qty - consumed,
        per_worker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recorder::{record_inspection, InspectionEntry};
    use crate::entities::Role;
    use chrono::Local;

    struct Fixture {
        store: Store,
        worker_a: RequestContext,
        worker_b: RequestContext,
        inspection_id: i64,
    }

    /// A slip with total_qty = 10 and two worker accounts
    fn fixture() -> Fixture {
        let mut store = Store::open_in_memory().unwrap();
        let now = Local::now().naive_local();
        let insp = store
            .insert_user("insp", Role::Inspector, None, now)
            .unwrap();
        let a = store.insert_user("a", Role::Worker, None, now).unwrap();
        let b = store.insert_user("b", Role::Worker, None, now).unwrap();

        let inspector = RequestContext::at(insp, Role::Inspector, now);
        let worker_a = RequestContext::at(a, Role::Worker, now);
        let worker_b = RequestContext::at(b, Role::Worker, now);

        let pid = store
            .insert_product("Coat", None, Some("brandx"), None, now)
            .unwrap();
        store
            .insert_sku(pid, "8800001", "black", "M", now)
            .unwrap()
            .unwrap();
        let inspection_id = record_inspection(
            &mut store,
            &inspector,
            &InspectionEntry {
                product_id: pid,
                barcode: "8800001".to_string(),
                operator: "brandx".to_string(),
                normal_qty: 10,
                defect_qty: 0,
                pending_qty: 0,
                comment: None,
            },
        )
        .unwrap();

        Fixture {
            store,
            worker_a,
            worker_b,
            inspection_id,
        }
    }

    fn submission(inspection_id: i64, repaired: u32, defect: u32) -> WorkSubmission {
        WorkSubmission {
            inspection_id,
            repaired_qty: repaired,
            additional_defect_qty: defect,
            difficulty: Difficulty::Refurb1,
            extra_tasks: vec![],
        }
    }

    #[test]
    fn test_quota_scenario_two_workers() {
        let mut f = fixture();

        // A takes 6 of 10
        submit_work(
            &mut f.store,
            &f.worker_a,
            &submission(f.inspection_id, 6, 0),
        )
        .unwrap();
        let s = summarize(&f.store, f.inspection_id).unwrap();
        assert_eq!(s.remaining, 4);

        // B asks for 5, over the remaining 4
        let err = submit_work(
            &mut f.store,
            &f.worker_b,
            &submission(f.inspection_id, 5, 0),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::QuotaExceeded { remaining: 4, .. }));
        // Ledger unchanged by the rejection
        assert_eq!(summarize(&f.store, f.inspection_id).unwrap().consumed, 6);

        // B takes exactly the remaining 4
        submit_work(
            &mut f.store,
            &f.worker_b,
            &submission(f.inspection_id, 4, 0),
        )
        .unwrap();
        assert_eq!(summarize(&f.store, f.inspection_id).unwrap().remaining, 0);

        // Nothing left for anyone
        assert!(matches!(
            submit_work(
                &mut f.store,
                &f.worker_a,
                &submission(f.inspection_id, 1, 0),
            ),
            Err(CoreError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn test_defects_count_against_quota() {
        let mut f = fixture();
        submit_work(
            &mut f.store,
            &f.worker_a,
            &submission(f.inspection_id, 4, 3),
        )
        .unwrap();
        let s = summarize(&f.store, f.inspection_id).unwrap();
        assert_eq!(s.consumed, 7);
        assert_eq!(s.remaining, 3);
    }

    #[test]
    fn test_zero_progress_rejected() {
        let mut f = fixture();
        assert!(matches!(
            submit_work(
                &mut f.store,
                &f.worker_a,
                &submission(f.inspection_id, 0, 0),
            ),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_inspection() {
        let mut f = fixture();
        assert!(matches!(
            submit_work(&mut f.store, &f.worker_a, &submission(999, 1, 0)),
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(
            summarize(&f.store, 999),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_summarize_empty_ledger() {
        let f = fixture();
        let s = summarize(&f.store, f.inspection_id).unwrap();
        assert_eq!(s.consumed, 0);
        assert_eq!(s.remaining, s.total_qty);
        assert!(s.per_worker.is_empty());
    }

    #[test]
    fn test_summarize_per_worker_tallies() {
        let mut f = fixture();
        submit_work(
            &mut f.store,
            &f.worker_a,
            &submission(f.inspection_id, 3, 1),
        )
        .unwrap();
        submit_work(
            &mut f.store,
            &f.worker_b,
            &submission(f.inspection_id, 2, 0),
        )
        .unwrap();

        let s = summarize(&f.store, f.inspection_id).unwrap();
        assert_eq!(s.per_worker.len(), 2);
        assert_eq!(s.per_worker[0].worker_id, f.worker_a.actor);
        assert_eq!(s.per_worker[0].repaired, 3);
        assert_eq!(s.per_worker[0].defect, 1);
        assert_eq!(s.per_worker[1].repaired, 2);
    }

    #[test]
    fn test_summarize_tolerates_overshoot() {
        let mut f = fixture();
        submit_work(
            &mut f.store,
            &f.worker_a,
            &submission(f.inspection_id, 8, 0),
        )
        .unwrap();

        // A later manual revision shrinks the slip's total below the
        // already recorded rework.
        f.store
            .conn()
            .execute(
                "UPDATE inspection_results SET total_qty = 5 WHERE id = ?1",
                params![f.inspection_id],
            )
            .unwrap();

        let s = summarize(&f.store, f.inspection_id).unwrap();
        assert_eq!(s.remaining, -3);
    }

    #[test]
    fn test_edit_respects_quota_and_keeps_row_on_failure() {
        let mut f = fixture();
        let own = submit_work(
            &mut f.store,
            &f.worker_a,
            &submission(f.inspection_id, 4, 0),
        )
        .unwrap();
        submit_work(
            &mut f.store,
            &f.worker_b,
            &submission(f.inspection_id, 5, 0),
        )
        .unwrap();

        // 4 -> 6 would make 11 of 10
        let err = edit_work_order(
            &mut f.store,
            &f.worker_a,
            own,
            &WorkRevision {
                repaired_qty: 6,
                additional_defect_qty: 0,
                difficulty: Difficulty::Refurb1,
                extra_tasks: vec![],
            },
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::QuotaExceeded { .. }));
        let row = f.store.work_order_by_id(own).unwrap().unwrap();
        assert_eq!(row.repaired_qty, 4);

        // 4 -> 5 fits exactly
        edit_work_order(
            &mut f.store,
            &f.worker_a,
            own,
            &WorkRevision {
                repaired_qty: 5,
                additional_defect_qty: 0,
                difficulty: Difficulty::Refurb2,
                extra_tasks: vec![ExtraTask::Steam],
            },
        )
        .unwrap();
        let row = f.store.work_order_by_id(own).unwrap().unwrap();
        assert_eq!(row.repaired_qty, 5);
        assert_eq!(row.difficulty, Difficulty::Refurb2);
        assert_eq!(row.extra_tasks, vec![ExtraTask::Steam]);
    }

    #[test]
    fn test_edit_by_non_owner_is_forbidden() {
        let mut f = fixture();
        let own = submit_work(
            &mut f.store,
            &f.worker_a,
            &submission(f.inspection_id, 4, 0),
        )
        .unwrap();

        let err = edit_work_order(
            &mut f.store,
            &f.worker_b,
            own,
            &WorkRevision {
                repaired_qty: 1,
                additional_defect_qty: 0,
                difficulty: Difficulty::Refurb1,
                extra_tasks: vec![],
            },
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden { .. }));
        let row = f.store.work_order_by_id(own).unwrap().unwrap();
        assert_eq!(row.repaired_qty, 4);
    }

    #[test]
    fn test_submit_emits_activity_after_commit() {
        let mut f = fixture();
        let id = submit_work(
            &mut f.store,
            &f.worker_a,
            &submission(f.inspection_id, 2, 0),
        )
        .unwrap();

        let log = f.store.recent_activity(1).unwrap();
        assert_eq!(log[0].table_name, "work_orders");
        assert_eq!(log[0].record_id, id);
        assert_eq!(log[0].user_id, f.worker_a.actor);
    }
}
