//! Activity log entity type - best-effort audit trail of core writes

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What a logged action did to its target row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityAction::Create => write!(f, "CREATE"),
            ActivityAction::Update => write!(f, "UPDATE"),
            ActivityAction::Delete => write!(f, "DELETE"),
        }
    }
}

impl std::str::FromStr for ActivityAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATE" => Ok(ActivityAction::Create),
            "UPDATE" => Ok(ActivityAction::Update),
            "DELETE" => Ok(ActivityAction::Delete),
            _ => Err(format!("Invalid action type: {}", s)),
        }
    }
}

/// One audit entry. Snapshots are JSON blobs of the row before and after
/// the action; CREATE entries carry an empty before-snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub user_id: i64,
    pub action: ActivityAction,
    pub table_name: String,
    pub record_id: i64,
    pub old_data: String,
    pub new_data: String,
    pub created_at: NaiveDateTime,
}
