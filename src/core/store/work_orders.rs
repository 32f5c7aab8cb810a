//! Work order reads backing the worker history and the daily log
//!
//! Writes (submit, edit) live in the ledger, which needs the quota check
//! and the insert inside one transaction.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{format_date, parse_timestamp, Store};
use crate::core::error::Result;
use crate::entities::work_order::parse_extra_tasks;
use crate::entities::{Difficulty, WorkOrder};

/// One worker-history row, joined with the slip's product
#[derive(Debug, Clone, Serialize)]
pub struct WorkListing {
    pub id: i64,
    pub inspection_id: i64,
    pub product_name: String,
    pub repaired_qty: u32,
    pub additional_defect_qty: u32,
    pub difficulty: String,
    pub extra_tasks: String,
    pub created_at: String,
}

/// One daily-log row across all workers
#[derive(Debug, Clone, Serialize)]
pub struct DailyWorkRow {
    pub inspection_id: i64,
    pub worker: String,
    pub repaired_qty: u32,
    pub additional_defect_qty: u32,
    pub difficulty: String,
    pub extra_tasks: String,
    pub created_at: String,
}

pub(super) fn work_order_from_row(row: &Row<'_>) -> rusqlite::Result<WorkOrder> {
    let difficulty_str: String = row.get(6)?;
    let extra_str: String = row.get(7)?;
    let created: String = row.get(8)?;
    Ok(WorkOrder {
        id: row.get(0)?,
        inspection_id: row.get(1)?,
        worker_id: row.get(2)?,
        repaired_qty: row.get::<_, i64>(3)? as u32,
        additional_defect_qty: row.get::<_, i64>(4)? as u32,
        approved: row.get::<_, i64>(5)? != 0,
        difficulty: difficulty_str.parse().unwrap_or(Difficulty::Refurb1),
        extra_tasks: parse_extra_tasks(&extra_str).unwrap_or_default(),
        created_at: parse_timestamp(&created),
    })
}

const WORK_ORDER_COLUMNS: &str = "id, inspection_id, worker_id, repaired_qty,
     additional_defect_qty, repaired_approved, difficulty, extra_tasks, created_at";

impl Store {
    pub fn work_order_by_id(&self, id: i64) -> Result<Option<WorkOrder>> {
        let sql = format!(
            "SELECT {} FROM work_orders WHERE id = ?1",
            WORK_ORDER_COLUMNS
        );
        let order = self
            .conn()
            .query_row(&sql, params![id], work_order_from_row)
            .optional()?;
        Ok(order)
    }

    /// A worker's own history within an inclusive date range, newest first
    pub fn work_orders_for_worker(
        &self,
        worker_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkListing>> {
        let mut stmt = self.conn().prepare(
            "SELECT w.id, w.inspection_id, p.product_name,
                    w.repaired_qty, w.additional_defect_qty,
                    w.difficulty, w.extra_tasks, w.created_at
               FROM work_orders w
               JOIN inspection_results ir ON w.inspection_id = ir.id
               JOIN products p ON ir.product_id = p.id
              WHERE w.worker_id = ?1
                AND DATE(w.created_at) BETWEEN DATE(?2) AND DATE(?3)
              ORDER BY w.created_at DESC, w.id DESC",
        )?;
        let rows = stmt.query_map(
            params![worker_id, format_date(&start), format_date(&end)],
            |row| {
                Ok(WorkListing {
                    id: row.get(0)?,
                    inspection_id: row.get(1)?,
                    product_name: row.get(2)?,
                    repaired_qty: row.get::<_, i64>(3)? as u32,
                    additional_defect_qty: row.get::<_, i64>(4)? as u32,
                    difficulty: row.get(5)?,
                    extra_tasks: row.get(6)?,
                    created_at: row.get(7)?,
                })
            },
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Today's work across all workers, newest first, capped
    pub fn daily_work_log(&self, date: NaiveDate, limit: usize) -> Result<Vec<DailyWorkRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT w.inspection_id, u.username, w.repaired_qty, w.additional_defect_qty,
                    w.difficulty, w.extra_tasks, w.created_at
               FROM work_orders w
               JOIN users u ON w.worker_id = u.id
              WHERE DATE(w.created_at) = DATE(?1)
              ORDER BY w.created_at DESC, w.id DESC
              LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![format_date(&date), limit as i64], |row| {
            Ok(DailyWorkRow {
                inspection_id: row.get(0)?,
                worker: row.get(1)?,
                repaired_qty: row.get::<_, i64>(2)? as u32,
                additional_defect_qty: row.get::<_, i64>(3)? as u32,
                difficulty: row.get(4)?,
                extra_tasks: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
