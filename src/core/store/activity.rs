//! Activity log queries

use chrono::NaiveDateTime;
use rusqlite::params;

use super::{format_timestamp, parse_timestamp, Store};
use crate::core::error::Result;
use crate::entities::{ActivityAction, ActivityRecord};

impl Store {
    pub fn insert_activity(
        &mut self,
        user_id: i64,
        action: ActivityAction,
        table_name: &str,
        record_id: i64,
        old_data: &str,
        new_data: &str,
        now: NaiveDateTime,
    ) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO activity_log
               (user_id, action_type, table_name, record_id, old_data, new_data, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user_id,
                action.to_string(),
                table_name,
                record_id,
                old_data,
                new_data,
                format_timestamp(&now)
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Most recent activity entries, newest first
    pub fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, action_type, table_name, record_id, old_data, new_data, created_at
               FROM activity_log
              ORDER BY id DESC
              LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            let action_str: String = row.get(2)?;
            let created: String = row.get(7)?;
            Ok(ActivityRecord {
                id: row.get(0)?,
                user_id: row.get(1)?,
                action: action_str.parse().unwrap_or(ActivityAction::Update),
                table_name: row.get(3)?,
                record_id: row.get(4)?,
                old_data: row.get(5)?,
                new_data: row.get(6)?,
                created_at: parse_timestamp(&created),
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
