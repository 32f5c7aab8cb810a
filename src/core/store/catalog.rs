//! Product catalogue queries: products, SKUs, and image records

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{format_timestamp, parse_timestamp, Store};
use crate::core::error::{CoreError, Result};
use crate::entities::{Product, ProductImage, Sku};

/// Filters for the catalogue listing
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub brand: Option<String>,
    pub vendor: Option<String>,
    /// Matches product name, option text, barcode, location, or id
    pub keyword: Option<String>,
}

/// One catalogue row with its SKU options flattened in
#[derive(Debug, Clone, Serialize)]
pub struct ProductListing {
    pub id: i64,
    pub product_name: String,
    pub options: String,
    pub barcodes: String,
    pub location: Option<String>,
    pub brand: Option<String>,
    pub created_at: NaiveDateTime,
}

/// A text-search hit: product plus its first barcode
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub product_name: String,
    pub barcode: Option<String>,
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    let created: String = row.get(5)?;
    Ok(Product {
        id: row.get(0)?,
        product_name: row.get(1)?,
        vendor: row.get(2)?,
        brand: row.get(3)?,
        location: row.get(4)?,
        created_at: parse_timestamp(&created),
    })
}

fn sku_from_row(row: &Row<'_>) -> rusqlite::Result<Sku> {
    let created: String = row.get(5)?;
    Ok(Sku {
        id: row.get(0)?,
        product_id: row.get(1)?,
        barcode: row.get(2)?,
        color: row.get(3)?,
        size: row.get(4)?,
        created_at: parse_timestamp(&created),
    })
}

impl Store {
    pub fn insert_product(
        &mut self,
        name: &str,
        vendor: Option<&str>,
        brand: Option<&str>,
        location: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<i64> {
        if name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "product name is empty".to_string(),
            ));
        }
        self.conn().execute(
            "INSERT INTO products (product_name, vendor, brand, location, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name.trim(), vendor, brand, location, format_timestamp(&now)],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn product_by_id(&self, id: i64) -> Result<Option<Product>> {
        let product = self
            .conn()
            .query_row(
                "SELECT id, product_name, vendor, brand, location, created_at
                 FROM products WHERE id = ?1",
                params![id],
                product_from_row,
            )
            .optional()?;
        Ok(product)
    }

    pub fn update_product(
        &mut self,
        id: i64,
        name: &str,
        vendor: Option<&str>,
        brand: Option<&str>,
        location: Option<&str>,
    ) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE products SET product_name = ?1, vendor = ?2, brand = ?3, location = ?4
             WHERE id = ?5",
            params![name, vendor, brand, location, id],
        )?;
        if changed == 0 {
            return Err(CoreError::NotFound {
                entity: "product",
                id,
            });
        }
        Ok(())
    }

    /// Delete a product. SKUs and image records go with it via the
    /// foreign-key cascade; inspection slips keep their product_id.
    pub fn delete_product(&mut self, id: i64) -> Result<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM products WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(CoreError::NotFound {
                entity: "product",
                id,
            });
        }
        Ok(())
    }

    /// Register a SKU. Returns None when the barcode is already taken
    /// (matching the original's insert-or-ignore on re-registration).
    pub fn insert_sku(
        &mut self,
        product_id: i64,
        barcode: &str,
        color: &str,
        size: &str,
        now: NaiveDateTime,
    ) -> Result<Option<i64>> {
        if barcode.trim().is_empty() {
            return Err(CoreError::InvalidInput("barcode is empty".to_string()));
        }
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO skus (product_id, barcode, color, size, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![product_id, barcode.trim(), color, size, format_timestamp(&now)],
        )?;
        if changed == 0 {
            Ok(None)
        } else {
            Ok(Some(self.conn().last_insert_rowid()))
        }
    }

    pub fn sku_by_barcode(&self, barcode: &str) -> Result<Option<Sku>> {
        let sku = self
            .conn()
            .query_row(
                "SELECT id, product_id, barcode, color, size, created_at
                 FROM skus WHERE barcode = ?1",
                params![barcode],
                sku_from_row,
            )
            .optional()?;
        Ok(sku)
    }

    pub fn skus_for_product(&self, product_id: i64) -> Result<Vec<Sku>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, product_id, barcode, color, size, created_at
             FROM skus WHERE product_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![product_id], sku_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn add_image(
        &mut self,
        product_id: i64,
        file_name: &str,
        is_main: bool,
        now: NaiveDateTime,
    ) -> Result<i64> {
        let tx = self.tx()?;
        if is_main {
            tx.execute(
                "UPDATE product_images SET is_main = 0 WHERE product_id = ?1",
                params![product_id],
            )?;
        }
        tx.execute(
            "INSERT INTO product_images (product_id, file_name, is_main, uploaded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![product_id, file_name, is_main as i64, format_timestamp(&now)],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// Mark one image as main, clearing the flag on its siblings
    pub fn set_main_image(&mut self, image_id: i64) -> Result<()> {
        let tx = self.tx()?;
        let product_id: Option<i64> = tx
            .query_row(
                "SELECT product_id FROM product_images WHERE id = ?1",
                params![image_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(product_id) = product_id else {
            return Err(CoreError::NotFound {
                entity: "image",
                id: image_id,
            });
        };
        tx.execute(
            "UPDATE product_images SET is_main = 0 WHERE product_id = ?1",
            params![product_id],
        )?;
        tx.execute(
            "UPDATE product_images SET is_main = 1 WHERE id = ?1",
            params![image_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn delete_image(&mut self, image_id: i64) -> Result<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM product_images WHERE id = ?1", params![image_id])?;
        if changed == 0 {
            return Err(CoreError::NotFound {
                entity: "image",
                id: image_id,
            });
        }
        Ok(())
    }

    pub fn images_for_product(&self, product_id: i64) -> Result<Vec<ProductImage>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, product_id, file_name, is_main, uploaded_at
             FROM product_images WHERE product_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![product_id], |row| {
            let uploaded: String = row.get(4)?;
            Ok(ProductImage {
                id: row.get(0)?,
                product_id: row.get(1)?,
                file_name: row.get(2)?,
                is_main: row.get::<_, i64>(3)? != 0,
                uploaded_at: parse_timestamp(&uploaded),
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Catalogue listing with options and barcodes aggregated per product
    pub fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut bound: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(brand) = &filter.brand {
            clauses.push("p.brand = ?");
            bound.push(Box::new(brand.clone()));
        }
        if let Some(vendor) = &filter.vendor {
            clauses.push("p.vendor = ?");
            bound.push(Box::new(vendor.clone()));
        }
        if let Some(keyword) = &filter.keyword {
            clauses.push(
                "(p.product_name LIKE ? OR s.option_text LIKE ? OR s.barcode_text LIKE ?
                  OR p.location LIKE ? OR CAST(p.id AS TEXT) LIKE ?)",
            );
            let like = format!("%{}%", keyword);
            for _ in 0..5 {
                bound.push(Box::new(like.clone()));
            }
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let sql = format!(
            "SELECT p.id, p.product_name,
                    IFNULL(s.option_text, '-')  AS option_text,
                    IFNULL(s.barcode_text, '-') AS barcode_text,
                    p.location, p.brand, p.created_at
               FROM products p
               LEFT JOIN (
                     SELECT product_id,
                            GROUP_CONCAT(DISTINCT color || '/' || size) AS option_text,
                            GROUP_CONCAT(DISTINCT barcode)              AS barcode_text
                       FROM skus
                      GROUP BY product_id
               ) s ON s.product_id = p.id
               {}
              ORDER BY p.created_at DESC",
            where_sql
        );

        let mut stmt = self.conn().prepare(&sql)?;
        let params_ref: Vec<&dyn rusqlite::ToSql> = bound.iter().map(|b| b.as_ref()).collect();
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            let created: String = row.get(6)?;
            Ok(ProductListing {
                id: row.get(0)?,
                product_name: row.get(1)?,
                options: row.get(2)?,
                barcodes: row.get(3)?,
                location: row.get(4)?,
                brand: row.get(5)?,
                created_at: parse_timestamp(&created),
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Name/barcode text search, capped at 30 hits
    pub fn search_products(&self, query: &str) -> Result<Vec<SearchHit>> {
        let like = format!("%{}%", query);
        let mut stmt = self.conn().prepare(
            "SELECT p.id, p.product_name, MIN(s.barcode)
               FROM products p
               LEFT JOIN skus s ON s.product_id = p.id
              WHERE p.product_name LIKE ?1 OR s.barcode LIKE ?1
              GROUP BY p.id
              ORDER BY p.id DESC
              LIMIT 30",
        )?;
        let rows = stmt.query_map(params![like], |row| {
            Ok(SearchHit {
                id: row.get(0)?,
                product_name: row.get(1)?,
                barcode: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn seeded() -> (Store, i64) {
        let mut store = Store::open_in_memory().unwrap();
        let now = Local::now().naive_local();
        let pid = store
            .insert_product("Wool Coat", Some("acme"), Some("brandx"), Some("A-3-2"), now)
            .unwrap();
        store
            .insert_sku(pid, "8800001", "black", "M", now)
            .unwrap()
            .unwrap();
        store
            .insert_sku(pid, "8800002", "black", "L", now)
            .unwrap()
            .unwrap();
        (store, pid)
    }

    #[test]
    fn test_sku_barcode_is_unique() {
        let (mut store, pid) = seeded();
        let now = Local::now().naive_local();
        assert!(store
            .insert_sku(pid, "8800001", "red", "S", now)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_product_cascades() {
        let (mut store, pid) = seeded();
        let now = Local::now().naive_local();
        store.add_image(pid, "front.jpg", true, now).unwrap();

        store.delete_product(pid).unwrap();
        assert!(store.sku_by_barcode("8800001").unwrap().is_none());
        assert!(store.images_for_product(pid).unwrap().is_empty());
    }

    #[test]
    fn test_set_main_image_clears_siblings() {
        let (mut store, pid) = seeded();
        let now = Local::now().naive_local();
        let first = store.add_image(pid, "a.jpg", true, now).unwrap();
        let second = store.add_image(pid, "b.jpg", false, now).unwrap();

        store.set_main_image(second).unwrap();
        let images = store.images_for_product(pid).unwrap();
        let main: Vec<i64> = images.iter().filter(|i| i.is_main).map(|i| i.id).collect();
        assert_eq!(main, vec![second]);
        assert_ne!(first, second);
    }

    #[test]
    fn test_list_products_keyword_matches_barcode() {
        let (store, pid) = seeded();
        let filter = ProductFilter {
            keyword: Some("8800002".to_string()),
            ..Default::default()
        };
        let rows = store.list_products(&filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, pid);

        let miss = ProductFilter {
            keyword: Some("nothing".to_string()),
            ..Default::default()
        };
        assert!(store.list_products(&miss).unwrap().is_empty());
    }

    #[test]
    fn test_list_products_brand_filter() {
        let (mut store, _) = seeded();
        let now = Local::now().naive_local();
        store
            .insert_product("Silk Scarf", None, Some("other"), None, now)
            .unwrap();

        let filter = ProductFilter {
            brand: Some("brandx".to_string()),
            ..Default::default()
        };
        let rows = store.list_products(&filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_name, "Wool Coat");
    }

    #[test]
    fn test_search_products() {
        let (store, pid) = seeded();
        let hits = store.search_products("Wool").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, pid);

        let by_barcode = store.search_products("8800001").unwrap();
        assert_eq!(by_barcode.len(), 1);
    }
}
