//! Inspection result entity type - one quantity-reconciliation slip per SKU scan

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Derived slip status. A slip holding a mix of quantities carries a single
/// label by priority: pending beats defective beats normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Normal,
    Defective,
    Pending,
}

impl InspectionStatus {
    /// Apply the pending > defective > normal priority rule
    pub fn derive(normal: u32, defect: u32, pending: u32) -> Self {
        let _ = normal;
        if pending > 0 {
            InspectionStatus::Pending
        } else if defect > 0 {
            InspectionStatus::Defective
        } else {
            InspectionStatus::Normal
        }
    }
}

impl std::fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InspectionStatus::Normal => write!(f, "normal"),
            InspectionStatus::Defective => write!(f, "defective"),
            InspectionStatus::Pending => write!(f, "pending"),
        }
    }
}

impl std::str::FromStr for InspectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(InspectionStatus::Normal),
            "defective" => Ok(InspectionStatus::Defective),
            "pending" => Ok(InspectionStatus::Pending),
            _ => Err(format!(
                "Invalid inspection status: {}. Use normal, defective, or pending",
                s
            )),
        }
    }
}

/// One inspection slip. Quantities are fixed at creation; only status and
/// comment may change afterwards, through the inspector list view.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionResult {
    pub id: i64,
    pub product_id: i64,
    pub barcode: String,
    /// Brand name at time of inspection
    pub operator: String,
    pub normal_qty: u32,
    pub defect_qty: u32,
    pub pending_qty: u32,
    pub total_qty: u32,
    pub status: InspectionStatus,
    pub comment: Option<String>,
    pub inspected_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_priority_pending_wins() {
        assert_eq!(
            InspectionStatus::derive(3, 2, 1),
            InspectionStatus::Pending
        );
        assert_eq!(
            InspectionStatus::derive(0, 0, 5),
            InspectionStatus::Pending
        );
    }

    #[test]
    fn test_status_priority_defect_over_normal() {
        assert_eq!(
            InspectionStatus::derive(9, 1, 0),
            InspectionStatus::Defective
        );
    }

    #[test]
    fn test_status_normal_only() {
        assert_eq!(InspectionStatus::derive(4, 0, 0), InspectionStatus::Normal);
        // All-zero entries are rejected upstream; the rule itself degrades
        // to "normal" for a zero triple.
        assert_eq!(InspectionStatus::derive(0, 0, 0), InspectionStatus::Normal);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            InspectionStatus::Normal,
            InspectionStatus::Defective,
            InspectionStatus::Pending,
        ] {
            assert_eq!(
                status.to_string().parse::<InspectionStatus>().unwrap(),
                status
            );
        }
    }
}
