//! Inspection recorder
//!
//! Turns a (normal, defect, pending) triple plus metadata into a persisted
//! inspection slip, and carries the slip's later status/comment revisions.

use rusqlite::params;
use serde_json::json;

use crate::core::audit;
use crate::core::context::RequestContext;
use crate::core::error::{CoreError, Result};
use crate::core::store::{format_timestamp, Store};
use crate::entities::{ActivityAction, InspectionStatus};

/// Input for one slip
#[derive(Debug, Clone)]
pub struct InspectionEntry {
    pub product_id: i64,
    pub barcode: String,
    /// Brand name recorded on the slip
    pub operator: String,
    pub normal_qty: u32,
    pub defect_qty: u32,
    pub pending_qty: u32,
    pub comment: Option<String>,
}

/// Create an inspection slip. Quantities must not all be zero, their sum
/// must fit a u32, and the barcode must be a registered SKU of the given
/// product. One insert; a store failure leaves no partial state.
pub fn record_inspection(
    store: &mut Store,
    ctx: &RequestContext,
    entry: &InspectionEntry,
) -> Result<i64> {
    if entry.normal_qty == 0 && entry.defect_qty == 0 && entry.pending_qty == 0 {
        return Err(CoreError::InvalidInput(
            "all quantities are zero; record at least one item".to_string(),
        ));
    }
    if store.product_by_id(entry.product_id)?.is_none() {
        return Err(CoreError::InvalidInput(format!(
            "product {} does not exist",
            entry.product_id
        )));
    }
    let sku_matches = store
        .sku_by_barcode(&entry.barcode)?
        .map_or(false, |sku| sku.product_id == entry.product_id);
    if !sku_matches {
        return Err(CoreError::InvalidInput(format!(
            "barcode {} is not a registered SKU of product {}",
            entry.barcode, entry.product_id
        )));
    }

    // Summed in u64: the individual quantities are unbounded u32s, and the
    // slip total must stay an exact u32 for the ledger's quota arithmetic.
    let total_wide = u64::from(entry.normal_qty)
        + u64::from(entry.defect_qty)
        + u64::from(entry.pending_qty);
    let total = u32::try_from(total_wide).map_err(|_| {
        CoreError::InvalidInput(format!(
            "quantities sum to {}, which exceeds the per-slip limit of {}",
            total_wide,
            u32::MAX
        ))
    })?;
    let status = InspectionStatus::derive(entry.normal_qty, entry.defect_qty, entry.pending_qty);

    store.conn().execute(
        "INSERT INTO inspection_results
           (product_id, barcode, operator, normal_qty, defect_qty, pending_qty,
            total_qty, status, comment, inspected_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            entry.product_id,
            entry.barcode,
            entry.operator,
            entry.normal_qty,
            entry.defect_qty,
            entry.pending_qty,
            total,
            status.to_string(),
            entry.comment,
            format_timestamp(&ctx.now),
        ],
    )?;
    let id = store.conn().last_insert_rowid();

    audit::record(
        store,
        ctx,
        ActivityAction::Create,
        "inspection_results",
        id,
        &json!({}),
        &json!({
            "product_id": entry.product_id,
            "barcode": entry.barcode,
            "normal_qty": entry.normal_qty,
            "defect_qty": entry.defect_qty,
            "pending_qty": entry.pending_qty,
            "total_qty": total,
            "status": status,
        }),
    );

    Ok(id)
}

/// Revise a slip's status and/or comment through the list view. Quantities
/// are never touched here.
pub fn revise_inspection(
    store: &mut Store,
    ctx: &RequestContext,
    inspection_id: i64,
    status: Option<InspectionStatus>,
    comment: Option<String>,
) -> Result<()> {
    let Some(before) = store.inspection_by_id(inspection_id)? else {
        return Err(CoreError::NotFound {
            entity: "inspection",
            id: inspection_id,
        });
    };

    let new_status = status.unwrap_or(before.status);
    let new_comment = comment.or_else(|| before.comment.clone());

    store.conn().execute(
        "UPDATE inspection_results SET status = ?1, comment = ?2 WHERE id = ?3",
        params![new_status.to_string(), new_comment, inspection_id],
    )?;

    audit::record(
        store,
        ctx,
        ActivityAction::Update,
        "inspection_results",
        inspection_id,
        &json!({ "status": before.status, "comment": before.comment }),
        &json!({ "status": new_status, "comment": new_comment }),
    );

    Ok(())
}

/// Bulk delete slips from the list view
pub fn delete_inspections(
    store: &mut Store,
    ctx: &RequestContext,
    ids: &[i64],
) -> Result<usize> {
    let deleted = store.delete_inspections(ids)?;
    for id in ids {
        audit::record(
            store,
            ctx,
            ActivityAction::Delete,
            "inspection_results",
            *id,
            &json!({}),
            &json!({}),
        );
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;
    use chrono::Local;

    fn setup() -> (Store, RequestContext, i64) {
        let mut store = Store::open_in_memory().unwrap();
        let now = Local::now().naive_local();
        let inspector = store
            .insert_user("insp", Role::Inspector, None, now)
            .unwrap();
        let ctx = RequestContext::at(inspector, Role::Inspector, now);
        let pid = store
            .insert_product("Coat", None, Some("brandx"), None, now)
            .unwrap();
        store
            .insert_sku(pid, "8800001", "black", "M", now)
            .unwrap()
            .unwrap();
        (store, ctx, pid)
    }

    fn entry(pid: i64, normal: u32, defect: u32, pending: u32) -> InspectionEntry {
        InspectionEntry {
            product_id: pid,
            barcode: "8800001".to_string(),
            operator: "brandx".to_string(),
            normal_qty: normal,
            defect_qty: defect,
            pending_qty: pending,
            comment: None,
        }
    }

    #[test]
    fn test_record_computes_total_and_status() {
        let (mut store, ctx, pid) = setup();
        let id = record_inspection(&mut store, &ctx, &entry(pid, 3, 2, 1)).unwrap();

        let slip = store.inspection_by_id(id).unwrap().unwrap();
        assert_eq!(slip.total_qty, 6);
        assert_eq!(slip.status, InspectionStatus::Pending);
    }

    #[test]
    fn test_record_rejects_sum_past_u32() {
        let (mut store, ctx, pid) = setup();
        let err = record_inspection(&mut store, &ctx, &entry(pid, u32::MAX, 1, 0)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
        // No partial slip was written
        assert!(store.inspection_by_id(1).unwrap().is_none());
    }

    #[test]
    fn test_record_accepts_sum_at_u32_max() {
        let (mut store, ctx, pid) = setup();
        let id = record_inspection(&mut store, &ctx, &entry(pid, u32::MAX - 1, 1, 0)).unwrap();
        let slip = store.inspection_by_id(id).unwrap().unwrap();
        assert_eq!(slip.total_qty, u32::MAX);
    }

    #[test]
    fn test_record_rejects_all_zero() {
        let (mut store, ctx, pid) = setup();
        let err = record_inspection(&mut store, &ctx, &entry(pid, 0, 0, 0)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_record_rejects_unknown_product_and_barcode() {
        let (mut store, ctx, pid) = setup();

        let mut bad_product = entry(999, 1, 0, 0);
        bad_product.barcode = "8800001".to_string();
        assert!(matches!(
            record_inspection(&mut store, &ctx, &bad_product),
            Err(CoreError::InvalidInput(_))
        ));

        let mut bad_barcode = entry(pid, 1, 0, 0);
        bad_barcode.barcode = "no-such".to_string();
        assert!(matches!(
            record_inspection(&mut store, &ctx, &bad_barcode),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_record_emits_activity() {
        let (mut store, ctx, pid) = setup();
        let id = record_inspection(&mut store, &ctx, &entry(pid, 2, 0, 0)).unwrap();

        let log = store.recent_activity(5).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].record_id, id);
        assert_eq!(log[0].table_name, "inspection_results");
    }

    #[test]
    fn test_revise_updates_status_and_comment() {
        let (mut store, ctx, pid) = setup();
        let id = record_inspection(&mut store, &ctx, &entry(pid, 0, 2, 0)).unwrap();

        revise_inspection(
            &mut store,
            &ctx,
            id,
            Some(InspectionStatus::Normal),
            Some("re-checked".to_string()),
        )
        .unwrap();

        let slip = store.inspection_by_id(id).unwrap().unwrap();
        assert_eq!(slip.status, InspectionStatus::Normal);
        assert_eq!(slip.comment.as_deref(), Some("re-checked"));
        // Quantities untouched
        assert_eq!(slip.defect_qty, 2);
    }

    #[test]
    fn test_revise_unknown_slip() {
        let (mut store, ctx, _) = setup();
        assert!(matches!(
            revise_inspection(&mut store, &ctx, 42, None, None),
            Err(CoreError::NotFound { .. })
        ));
    }
}
