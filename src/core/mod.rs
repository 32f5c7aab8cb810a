//! Core logic: the persistent store, the inspection recorder, the
//! work-order ledger, and the retention pruner
//!
//! Everything here is synchronous and single-statement or
//! single-transaction; callers decide about retries.

pub mod audit;
pub mod context;
pub mod error;
pub mod ledger;
pub mod period;
pub mod pruner;
pub mod recorder;
pub mod store;

pub use context::RequestContext;
pub use error::{CoreError, Result};
pub use period::Period;
pub use store::Store;
