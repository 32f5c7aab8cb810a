//! User account queries

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};

use super::{format_timestamp, parse_timestamp, Store};
use crate::core::error::{CoreError, Result};
use crate::entities::{Role, User};

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let role_str: String = row.get(2)?;
    let created: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        role: role_str.parse().unwrap_or(Role::Worker),
        brand: row.get(3)?,
        created_at: parse_timestamp(&created),
    })
}

impl Store {
    pub fn insert_user(
        &mut self,
        username: &str,
        role: Role,
        brand: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<i64> {
        if username.trim().is_empty() {
            return Err(CoreError::InvalidInput("username is empty".to_string()));
        }
        self.conn().execute(
            "INSERT INTO users (username, role, brand, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![username.trim(), role.to_string(), brand, format_timestamp(&now)],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT id, username, role, brand, created_at FROM users WHERE id = ?1",
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT id, username, role, brand, created_at FROM users WHERE username = ?1",
                params![username],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, username, role, brand, created_at FROM users ORDER BY id")?;
        let rows = stmt.query_map([], user_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Seed the default accounts on an empty database. Returns how many
    /// were created (0 when users already exist).
    pub fn seed_default_users(&mut self, now: NaiveDateTime) -> Result<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(0);
        }

        self.insert_user("admin", Role::Admin, None, now)?;
        self.insert_user("op1", Role::Operator, Some("op1"), now)?;
        self.insert_user("insp1", Role::Inspector, None, now)?;
        self.insert_user("worker1", Role::Worker, None, now)?;
        Ok(4)
    }
}
