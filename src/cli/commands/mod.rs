//! Command handler modules

pub mod activity;
pub mod completions;
pub mod init;
pub mod inspect;
pub mod product;
pub mod user;
pub mod work;
