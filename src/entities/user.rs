//! User entity type - accounts and their roles

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Account role, checked at the CLI boundary before core calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including user and activity-log management
    Admin,
    /// Brand account, sees only its own products
    Operator,
    /// Registers products and records inspection results
    Inspector,
    /// Logs rework against inspection slips
    Worker,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Operator => write!(f, "operator"),
            Role::Inspector => write!(f, "inspector"),
            Role::Worker => write!(f, "worker"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "operator" => Ok(Role::Operator),
            "inspector" => Ok(Role::Inspector),
            "worker" => Ok(Role::Worker),
            _ => Err(format!(
                "Invalid role: {}. Use admin, operator, inspector, or worker",
                s
            )),
        }
    }
}

/// A user account (no credentials - authentication lives outside this tool)
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    /// Brand the account is scoped to (operators only)
    pub brand: Option<String>,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Operator, Role::Inspector, Role::Worker] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert!("manager".parse::<Role>().is_err());
    }
}
