//! Request-scoped caller context
//!
//! Every core call takes a context naming the acting user and the moment of
//! the request, instead of reading ambient session state. Role checks happen
//! at the CLI boundary; the core only uses the actor id for ownership and
//! attribution.

use chrono::{Local, NaiveDateTime};

use crate::entities::Role;

/// Who is performing the operation, and when
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    /// users.id of the caller
    pub actor: i64,
    pub role: Role,
    /// Wall-clock time of the request; fixed here so one request's writes
    /// and retention math all see the same instant
    pub now: NaiveDateTime,
}

impl RequestContext {
    pub fn new(actor: i64, role: Role) -> Self {
        Self {
            actor,
            role,
            now: Local::now().naive_local(),
        }
    }

    /// Context pinned to an explicit instant
    pub fn at(actor: i64, role: Role, now: NaiveDateTime) -> Self {
        Self { actor, role, now }
    }
}
