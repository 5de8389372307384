//! Cost centers: budget-owning units arranged in a forest through
//! `parent_cost_center_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Money;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCenter {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub manager: String,
    #[serde(default)]
    pub monthly_budget: Option<Money>,
    #[serde(default)]
    pub yearly_budget: Option<Money>,
    #[serde(default)]
    pub budget_period: Option<String>,
    #[serde(default)]
    pub parent_cost_center_id: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub actual_monthly_cost: Money,
    #[serde(default)]
    pub actual_yearly_cost: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating or replacing a cost center.
///
/// Actuals and timestamps are owned by the store and are not accepted here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterInput {
    #[serde(default)]
    pub id: Option<String>,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub manager: String,
    #[serde(default)]
    pub monthly_budget: Option<Money>,
    #[serde(default)]
    pub yearly_budget: Option<Money>,
    #[serde(default)]
    pub budget_period: Option<String>,
    #[serde(default)]
    pub parent_cost_center_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CostCenterInput {
    pub fn new(code: impl Into<String>, name: impl Into<String>, manager: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            description: None,
            manager: manager.into(),
            monthly_budget: None,
            yearly_budget: None,
            budget_period: None,
            parent_cost_center_id: None,
            is_active: true,
        }
    }

    #[must_use]
    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_cost_center_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub fn budgets(mut self, monthly: Option<Money>, yearly: Option<Money>) -> Self {
        self.monthly_budget = monthly;
        self.yearly_budget = yearly;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn budget_period(mut self, period: impl Into<String>) -> Self {
        self.budget_period = Some(period.into());
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

impl From<&CostCenter> for CostCenterInput {
    fn from(center: &CostCenter) -> Self {
        Self {
            id: Some(center.id.clone()),
            code: center.code.clone(),
            name: center.name.clone(),
            description: center.description.clone(),
            manager: center.manager.clone(),
            monthly_budget: center.monthly_budget,
            yearly_budget: center.yearly_budget,
            budget_period: center.budget_period.clone(),
            parent_cost_center_id: center.parent_cost_center_id.clone(),
            is_active: center.is_active,
        }
    }
}

/// Cost-center state captured onto an allocation at calculation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterSnapshot {
    pub id: String,
    pub code: String,
    pub name: String,
    pub manager: String,
    pub is_active: bool,
}

impl From<&CostCenter> for CostCenterSnapshot {
    fn from(center: &CostCenter) -> Self {
        Self {
            id: center.id.clone(),
            code: center.code.clone(),
            name: center.name.clone(),
            manager: center.manager.clone(),
            is_active: center.is_active,
        }
    }
}
