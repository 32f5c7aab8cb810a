//! Domain types for the inspection and rework tracker
//!
//! Each module defines one entity family: plain data structs plus the
//! enums (role, status, difficulty, extra tasks) with the string forms
//! they take in the database.

pub mod activity;
pub mod inspection;
pub mod product;
pub mod user;
pub mod work_order;

pub use activity::{ActivityAction, ActivityRecord};
pub use inspection::{InspectionResult, InspectionStatus};
pub use product::{Product, ProductImage, Sku};
pub use user::{Role, User};
pub use work_order::{Difficulty, ExtraTask, WorkOrder};
