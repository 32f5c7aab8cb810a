//! SQLite-backed persistent store
//!
//! Owns all durable state: users, products, skus, inspection results, work
//! orders, product images, and the activity log. Query methods are split
//! across submodules by entity family; schema setup lives in `schema`.
//!
//! Timestamps are stored as `%Y-%m-%d %H:%M:%S` text and date-filtered with
//! SQLite's `DATE()`, matching the data produced by earlier versions of the
//! tracker.

mod activity;
mod catalog;
mod inspections;
mod schema;
mod users;
mod work_orders;

pub use catalog::{ProductFilter, ProductListing, SearchHit};
pub use inspections::{InspectionFilter, InspectionListing};
pub use work_orders::{DailyWorkRow, WorkListing};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::core::error::Result;

/// Stored timestamp format
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default database file name under the user data directory
pub const DB_FILE: &str = "seamline.db";

/// The persistent store backed by a single SQLite database
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the database at `path`, initializing the schema on
    /// first use. WAL mode is enabled for concurrent reader sessions.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        let mut store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Default database location under the per-user data directory
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "seamline")
            .map(|dirs| dirs.data_dir().join(DB_FILE))
            .unwrap_or_else(|| PathBuf::from(DB_FILE))
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin an immediate transaction. The write lock is taken up front, so
    /// a read-aggregate-then-insert sequence inside it cannot interleave
    /// with another submitter's.
    pub(crate) fn tx(&mut self) -> rusqlite::Result<Transaction<'_>> {
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
    }
}

/// Format a timestamp in the stored text form
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Format a date in the stored `YYYY-MM-DD` form
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a stored timestamp, falling back to the epoch for rows written by
/// hand or by older tools
pub fn parse_timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| NaiveDateTime::default())
}
