//! Error type shared by the recorder, ledger, and pruner

use thiserror::Error;

/// Errors surfaced by core operations. `QuotaExceeded` and `Forbidden` are
/// ordinary user-facing outcomes; `Persistence` and `Io` are infrastructure
/// faults. Nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error(
        "quota exceeded: {requested} requested but only {remaining} of {total} inspected items remain"
    )]
    QuotaExceeded {
        requested: i64,
        remaining: i64,
        total: i64,
    },

    #[error("work order {work_order} belongs to another worker")]
    Forbidden { work_order: i64 },

    #[error("store error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
