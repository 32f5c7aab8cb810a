//! Shared helpers for command handlers

use miette::{miette, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::core::store::Store;
use crate::core::RequestContext;
use crate::entities::Role;

/// Open the store at the configured (or default) path.
pub fn open_store(global: &GlobalOpts) -> Result<Store> {
    let path = match &global.db {
        Some(p) => p.clone(),
        None => Store::default_path(),
    };
    Store::open(&path).into_diagnostic()
}

/// Resolve the acting user into a request context.
///
/// Every mutating command goes through here so role checks always apply
/// to a real account, not a free-form string.
pub fn request_context(store: &Store, global: &GlobalOpts) -> Result<RequestContext> {
    let id = global
        .user
        .ok_or_else(|| miette!("no acting user: pass --user <ID> or set SEAMLINE_USER"))?;
    let user = store
        .user_by_id(id)
        .into_diagnostic()?
        .ok_or_else(|| miette!("user {} not found; run `seamline user list`", id))?;
    Ok(RequestContext::new(user.id, user.role))
}

/// Fail unless the acting user holds one of the listed roles.
/// Admins pass every check; an empty list means admin-only.
pub fn require_role(ctx: &RequestContext, allowed: &[Role]) -> Result<()> {
    if ctx.role == Role::Admin || allowed.contains(&ctx.role) {
        return Ok(());
    }
    let wanted = if allowed.is_empty() {
        "admin".to_string()
    } else {
        allowed
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(" or ")
    };
    Err(miette!(
        "this command requires the {} role (acting user is {})",
        wanted,
        ctx.role
    ))
}

/// Shorten long free-text fields for table cells.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_strings_alone() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_cuts_long_strings() {
        let out = truncate_str("a very long comment indeed", 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with('…'));
    }
}
