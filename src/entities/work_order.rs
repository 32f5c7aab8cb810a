//! Work order entity type - one unit of rework progress against an inspection slip

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Rework difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Standard refurbishment
    Refurb1,
    /// Heavier refurbishment
    Refurb2,
    /// Premium-grade refurbishment
    Premium,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Refurb1
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Refurb1 => write!(f, "refurb1"),
            Difficulty::Refurb2 => write!(f, "refurb2"),
            Difficulty::Premium => write!(f, "premium"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "refurb1" => Ok(Difficulty::Refurb1),
            "refurb2" => Ok(Difficulty::Refurb2),
            "premium" => Ok(Difficulty::Premium),
            _ => Err(format!(
                "Invalid difficulty: {}. Use refurb1, refurb2, or premium",
                s
            )),
        }
    }
}

/// Extra task performed alongside the rework itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraTask {
    Steam,
    Mend,
    Wash,
}

impl std::fmt::Display for ExtraTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtraTask::Steam => write!(f, "steam"),
            ExtraTask::Mend => write!(f, "mend"),
            ExtraTask::Wash => write!(f, "wash"),
        }
    }
}

impl std::str::FromStr for ExtraTask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "steam" => Ok(ExtraTask::Steam),
            "mend" => Ok(ExtraTask::Mend),
            "wash" => Ok(ExtraTask::Wash),
            _ => Err(format!("Invalid extra task: {}. Use steam, mend, or wash", s)),
        }
    }
}

/// Parse a comma-separated extra task list ("steam,wash"). Empty input
/// yields an empty list.
pub fn parse_extra_tasks(s: &str) -> Result<Vec<ExtraTask>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}

/// Join extra tasks back into the stored comma-separated form
pub fn join_extra_tasks(tasks: &[ExtraTask]) -> String {
    tasks
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// One work session logged against an inspection slip. Immutable after
/// creation except through the owner's explicit edit; pruned automatically
/// once past the retention window.
#[derive(Debug, Clone, Serialize)]
pub struct WorkOrder {
    pub id: i64,
    pub inspection_id: i64,
    pub worker_id: i64,
    /// Items returned to normal condition this session
    pub repaired_qty: u32,
    /// Defects newly found during rework
    pub additional_defect_qty: u32,
    /// Reserved approval flag, always false today
    pub approved: bool,
    pub difficulty: Difficulty,
    pub extra_tasks: Vec<ExtraTask>,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extra_tasks() {
        assert_eq!(
            parse_extra_tasks("steam, wash").unwrap(),
            vec![ExtraTask::Steam, ExtraTask::Wash]
        );
        assert!(parse_extra_tasks("").unwrap().is_empty());
        assert!(parse_extra_tasks("steam,ironing").is_err());
    }

    #[test]
    fn test_join_extra_tasks() {
        assert_eq!(
            join_extra_tasks(&[ExtraTask::Steam, ExtraTask::Mend]),
            "steam,mend"
        );
        assert_eq!(join_extra_tasks(&[]), "");
    }

    #[test]
    fn test_difficulty_round_trip() {
        for d in [Difficulty::Refurb1, Difficulty::Refurb2, Difficulty::Premium] {
            assert_eq!(d.to_string().parse::<Difficulty>().unwrap(), d);
        }
    }
}
