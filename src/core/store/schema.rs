//! Database schema initialization

use rusqlite::params;

use super::Store;
use crate::core::error::{CoreError, Result};

/// Current schema version. Older databases are migrated additively; a newer
/// version than this is refused rather than misread.
const SCHEMA_VERSION: i32 = 1;

impl Store {
    /// Initialize database schema. Idempotent.
    pub(super) fn init_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Accounts. No credential columns: authentication storage is
            -- handled outside this tool.
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL,
                brand TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_name TEXT NOT NULL,
                vendor TEXT,
                brand TEXT,
                location TEXT,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_products_brand ON products(brand);
            CREATE INDEX IF NOT EXISTS idx_products_vendor ON products(vendor);

            CREATE TABLE IF NOT EXISTS skus (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER NOT NULL,
                barcode TEXT NOT NULL UNIQUE,
                color TEXT NOT NULL DEFAULT '',
                size TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_skus_product ON skus(product_id);

            CREATE TABLE IF NOT EXISTS product_images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER NOT NULL,
                file_name TEXT NOT NULL,
                is_main INTEGER NOT NULL DEFAULT 0,
                uploaded_at TEXT NOT NULL,
                FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_product_images_product
                ON product_images(product_id);

            -- Inspection slips. product_id is deliberately unconstrained:
            -- slips outlive deleted products and joined listings skip them.
            CREATE TABLE IF NOT EXISTS inspection_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER NOT NULL,
                barcode TEXT NOT NULL,
                operator TEXT NOT NULL DEFAULT '',
                normal_qty INTEGER NOT NULL DEFAULT 0,
                defect_qty INTEGER NOT NULL DEFAULT 0,
                pending_qty INTEGER NOT NULL DEFAULT 0,
                total_qty INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL,
                comment TEXT,
                inspected_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_inspection_results_barcode
                ON inspection_results(barcode);
            CREATE INDEX IF NOT EXISTS idx_inspection_results_inspected
                ON inspection_results(inspected_at);

            -- Rework ledger rows. inspection_id is unconstrained for the
            -- same reason: the ledger history survives slip deletion.
            CREATE TABLE IF NOT EXISTS work_orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                inspection_id INTEGER NOT NULL,
                worker_id INTEGER NOT NULL,
                repaired_qty INTEGER NOT NULL DEFAULT 0,
                additional_defect_qty INTEGER NOT NULL DEFAULT 0,
                repaired_approved INTEGER NOT NULL DEFAULT 0,
                difficulty TEXT NOT NULL,
                extra_tasks TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_work_orders_inspection
                ON work_orders(inspection_id);
            CREATE INDEX IF NOT EXISTS idx_work_orders_worker
                ON work_orders(worker_id, created_at);

            CREATE TABLE IF NOT EXISTS activity_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                action_type TEXT NOT NULL,
                table_name TEXT NOT NULL,
                record_id INTEGER NOT NULL,
                old_data TEXT NOT NULL DEFAULT '{}',
                new_data TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_activity_log_created
                ON activity_log(created_at);
            "#,
        )?;

        let existing: Option<i32> = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .ok();

        match existing {
            None => {
                self.conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![SCHEMA_VERSION],
                )?;
            }
            Some(v) if v == SCHEMA_VERSION => {}
            Some(v) if v < SCHEMA_VERSION => {
                // Additive migrations go here as versions accrue.
                self.conn.execute(
                    "UPDATE schema_version SET version = ?1",
                    params![SCHEMA_VERSION],
                )?;
            }
            Some(v) => {
                return Err(CoreError::InvalidInput(format!(
                    "database schema version {} is newer than this build supports ({})",
                    v, SCHEMA_VERSION
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::store::Store;

    #[test]
    fn test_schema_init_is_idempotent() {
        let mut store = Store::open_in_memory().unwrap();
        store.init_schema().unwrap();

        let version: i32 = store
            .conn()
            .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_all_tables_exist() {
        let store = Store::open_in_memory().unwrap();
        for table in [
            "users",
            "products",
            "skus",
            "product_images",
            "inspection_results",
            "work_orders",
            "activity_log",
        ] {
            let count: i64 = store
                .conn()
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }
}
