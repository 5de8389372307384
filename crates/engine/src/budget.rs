//! Planned spend per cost center, summed from the allocations' derived plans
//! and compared with the center's monthly budget.

use std::collections::HashMap;

use crate::{Money, Snapshot};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetUsage {
    pub cost_center_id: String,
    pub code: String,
    pub name: String,
    pub allocations: usize,
    /// Sum of `plan.cost_monthly`.
    pub planned_monthly: Money,
    /// Sum of `plan.cost_project`.
    pub planned_project: Money,
    pub monthly_budget: Option<Money>,
}

impl BudgetUsage {
    /// `None` when the center has no monthly budget.
    #[must_use]
    pub fn remaining_monthly(&self) -> Option<Money> {
        self.monthly_budget.map(|budget| budget - self.planned_monthly)
    }

    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.remaining_monthly().is_some_and(Money::is_negative)
    }
}

/// One row per cost center, in collection order. Allocations pointing at an
/// unknown cost center, or at none, are not counted.
pub fn usage(snapshot: &Snapshot) -> Vec<BudgetUsage> {
    let mut rows: Vec<BudgetUsage> = snapshot
        .cost_centers
        .iter()
        .map(|center| BudgetUsage {
            cost_center_id: center.id.clone(),
            code: center.code.clone(),
            name: center.name.clone(),
            allocations: 0,
            planned_monthly: Money::ZERO,
            planned_project: Money::ZERO,
            monthly_budget: center.monthly_budget,
        })
        .collect();
    let by_id: HashMap<&str, usize> = snapshot
        .cost_centers
        .iter()
        .enumerate()
        .map(|(index, center)| (center.id.as_str(), index))
        .collect();

    for allocation in &snapshot.allocations {
        let Some(&index) = allocation
            .cost_center_id
            .as_deref()
            .and_then(|id| by_id.get(id))
        else {
            continue;
        };
        let row = &mut rows[index];
        row.allocations += 1;
        row.planned_monthly += allocation.plan.cost_monthly;
        row.planned_project += allocation.plan.cost_project;
    }
    rows
}
