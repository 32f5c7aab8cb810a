//! Product, SKU, and product image entity types

use chrono::NaiveDateTime;
use serde::Serialize;

/// A registered product (one resale listing, possibly many SKUs)
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub product_name: String,
    /// Wholesale source
    pub vendor: Option<String>,
    /// Brand / operator the product belongs to
    pub brand: Option<String>,
    /// Physical storage location, e.g. "A-3-2"
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
}

/// One color/size variant of a product, identified by its barcode
#[derive(Debug, Clone, Serialize)]
pub struct Sku {
    pub id: i64,
    pub product_id: i64,
    pub barcode: String,
    pub color: String,
    pub size: String,
    pub created_at: NaiveDateTime,
}

impl Sku {
    /// Human-readable option label, "-" when the SKU has no variants
    pub fn option_label(&self) -> String {
        if self.color.is_empty() && self.size.is_empty() {
            "-".to_string()
        } else {
            format!("{} / {}", self.color, self.size)
        }
    }
}

/// A stored image reference. File contents live outside the database;
/// only the name and main-image flag are tracked here.
#[derive(Debug, Clone, Serialize)]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    pub file_name: String,
    pub is_main: bool,
    pub uploaded_at: NaiveDateTime,
}
