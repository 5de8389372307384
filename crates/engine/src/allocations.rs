//! Allocations: a member assigned to a task over a time window, carrying the
//! derived plan and the cost-center/COA snapshots from the last calculation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CoaSnapshot, CostCenterSnapshot, Money, RoleType};

/// Derived schedule and cost of an allocation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default)]
    pub task_start: Option<NaiveDate>,
    #[serde(default)]
    pub task_end: Option<NaiveDate>,
    #[serde(default)]
    pub duration_days: u32,
    #[serde(default)]
    pub cost_monthly: Money,
    #[serde(default)]
    pub cost_project: Money,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub id: String,
    pub member_id: String,
    pub member_name: String,
    pub role: RoleType,
    pub task_id: String,
    pub task_name: String,
    pub phase_id: String,
    /// Complexity level key.
    pub complexity: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub plan: Plan,
    /// Man-days.
    #[serde(default)]
    pub workload: f64,
    #[serde(default)]
    pub cost_center_id: Option<String>,
    #[serde(default)]
    pub cost_center_snapshot: Option<CostCenterSnapshot>,
    #[serde(default)]
    pub coa_id: Option<String>,
    #[serde(default)]
    pub coa_snapshot: Option<CoaSnapshot>,
}
