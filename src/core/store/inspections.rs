//! Inspection slip queries
//!
//! Row creation goes through the recorder; the methods here are the reads
//! and the list-view edits (status/comment, bulk delete) that sit behind
//! the inspector's result list.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{format_date, parse_timestamp, Store};
use crate::core::error::Result;
use crate::entities::{InspectionResult, InspectionStatus};

/// Filters for the inspector's result list
#[derive(Debug, Clone, Default)]
pub struct InspectionFilter {
    pub operator: Option<String>,
    pub status: Option<InspectionStatus>,
}

/// One result-list row, joined with its product
#[derive(Debug, Clone, Serialize)]
pub struct InspectionListing {
    pub id: i64,
    pub inspected_at: String,
    pub status: InspectionStatus,
    pub product_name: String,
    pub location: Option<String>,
    pub barcode: String,
    pub operator: String,
    pub normal_qty: u32,
    pub defect_qty: u32,
    pub pending_qty: u32,
    pub total_qty: u32,
    pub comment: Option<String>,
}

pub(super) fn inspection_from_row(row: &Row<'_>) -> rusqlite::Result<InspectionResult> {
    let status_str: String = row.get(8)?;
    let inspected: String = row.get(10)?;
    Ok(InspectionResult {
        id: row.get(0)?,
        product_id: row.get(1)?,
        barcode: row.get(2)?,
        operator: row.get(3)?,
        normal_qty: row.get::<_, i64>(4)? as u32,
        defect_qty: row.get::<_, i64>(5)? as u32,
        pending_qty: row.get::<_, i64>(6)? as u32,
        total_qty: row.get::<_, i64>(7)? as u32,
        status: status_str.parse().unwrap_or(InspectionStatus::Normal),
        comment: row.get(9)?,
        inspected_at: parse_timestamp(&inspected),
    })
}

const INSPECTION_COLUMNS: &str = "id, product_id, barcode, operator, normal_qty, defect_qty,
     pending_qty, total_qty, status, comment, inspected_at";

impl Store {
    pub fn inspection_by_id(&self, id: i64) -> Result<Option<InspectionResult>> {
        let sql = format!(
            "SELECT {} FROM inspection_results WHERE id = ?1",
            INSPECTION_COLUMNS
        );
        let slip = self
            .conn()
            .query_row(&sql, params![id], inspection_from_row)
            .optional()?;
        Ok(slip)
    }

    /// The newest slip for a barcode inspected on `date` - the worker's
    /// scan lookup ("today's slip")
    pub fn latest_inspection_for_barcode(
        &self,
        barcode: &str,
        date: NaiveDate,
    ) -> Result<Option<InspectionResult>> {
        let sql = format!(
            "SELECT {} FROM inspection_results
              WHERE barcode = ?1 AND DATE(inspected_at) = DATE(?2)
              ORDER BY id DESC LIMIT 1",
            INSPECTION_COLUMNS
        );
        let slip = self
            .conn()
            .query_row(&sql, params![barcode, format_date(&date)], inspection_from_row)
            .optional()?;
        Ok(slip)
    }

    /// Result list joined with products, newest first. Slips whose product
    /// has been deleted do not appear, as in earlier versions.
    pub fn list_inspections(&self, filter: &InspectionFilter) -> Result<Vec<InspectionListing>> {
        let mut sql = String::from(
            "SELECT ir.id, ir.inspected_at, ir.status, p.product_name, p.location,
                    ir.barcode, ir.operator, ir.normal_qty, ir.defect_qty,
                    ir.pending_qty, ir.total_qty, ir.comment
               FROM inspection_results ir
               JOIN products p ON ir.product_id = p.id",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut bound: Vec<String> = Vec::new();
        if let Some(operator) = &filter.operator {
            clauses.push("ir.operator = ?");
            bound.push(operator.clone());
        }
        if let Some(status) = &filter.status {
            clauses.push("ir.status = ?");
            bound.push(status.to_string());
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY ir.inspected_at DESC, ir.id DESC");

        let mut stmt = self.conn().prepare(&sql)?;
        let params_ref: Vec<&dyn rusqlite::ToSql> =
            bound.iter().map(|b| b as &dyn rusqlite::ToSql).collect();
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            let status_str: String = row.get(2)?;
            Ok(InspectionListing {
                id: row.get(0)?,
                inspected_at: row.get(1)?,
                status: status_str.parse().unwrap_or(InspectionStatus::Normal),
                product_name: row.get(3)?,
                location: row.get(4)?,
                barcode: row.get(5)?,
                operator: row.get(6)?,
                normal_qty: row.get::<_, i64>(7)? as u32,
                defect_qty: row.get::<_, i64>(8)? as u32,
                pending_qty: row.get::<_, i64>(9)? as u32,
                total_qty: row.get::<_, i64>(10)? as u32,
                comment: row.get(11)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Distinct operator names appearing on slips, for filter choices
    pub fn inspection_operators(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn().prepare(
            "SELECT DISTINCT operator FROM inspection_results
              WHERE operator <> '' ORDER BY operator",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Bulk delete by id, with a bound parameter per id
    pub fn delete_inspections(&mut self, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; ids.len()].join(",");
        let sql = format!(
            "DELETE FROM inspection_results WHERE id IN ({})",
            placeholders
        );
        let params_ref: Vec<&dyn rusqlite::ToSql> =
            ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();
        let deleted = self.conn().execute(&sql, params_ref.as_slice())?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::format_timestamp;
    use chrono::Local;

    fn store_with_slips() -> Store {
        let mut store = Store::open_in_memory().unwrap();
        let now = Local::now().naive_local();
        let pid = store
            .insert_product("Coat", None, Some("brandx"), None, now)
            .unwrap();
        for (barcode, status) in [("b1", "normal"), ("b2", "defective")] {
            store
                .conn()
                .execute(
                    "INSERT INTO inspection_results
                       (product_id, barcode, operator, normal_qty, defect_qty, pending_qty,
                        total_qty, status, inspected_at)
                     VALUES (?1, ?2, 'brandx', 5, 0, 0, 5, ?3, ?4)",
                    params![pid, barcode, status, format_timestamp(&now)],
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn test_list_inspections_status_filter() {
        let store = store_with_slips();
        let all = store.list_inspections(&InspectionFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let defective = store
            .list_inspections(&InspectionFilter {
                status: Some(InspectionStatus::Defective),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(defective.len(), 1);
        assert_eq!(defective[0].barcode, "b2");
    }

    #[test]
    fn test_latest_inspection_for_barcode_picks_newest_today() {
        let store = store_with_slips();
        let today = Local::now().date_naive();
        let slip = store
            .latest_inspection_for_barcode("b1", today)
            .unwrap()
            .unwrap();
        assert_eq!(slip.barcode, "b1");

        let other_day = today - chrono::Duration::days(3);
        assert!(store
            .latest_inspection_for_barcode("b1", other_day)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_inspections_bound_ids() {
        let mut store = store_with_slips();
        let all = store.list_inspections(&InspectionFilter::default()).unwrap();
        let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        assert_eq!(store.delete_inspections(&ids).unwrap(), 2);
        assert_eq!(store.delete_inspections(&[]).unwrap(), 0);
    }
}
