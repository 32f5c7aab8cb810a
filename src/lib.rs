//! Seamline: garment inspection and rework tracking
//!
//! A CLI for a clothing resale operation: inspectors register products and
//! record per-SKU inspection quantities, workers log rework against the
//! resulting slips, and the ledger keeps cumulative rework within what was
//! inspected.

pub mod cli;
pub mod core;
pub mod entities;
