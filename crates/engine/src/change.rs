//! Decides whether a recalculated allocation list differs from the committed
//! one in any derived field.

use crate::Allocation;

fn derived_fields_differ(old: &Allocation, new: &Allocation) -> bool {
    old.plan.cost_project != new.plan.cost_project
        || old.plan.cost_monthly != new.plan.cost_monthly
        || old.plan.task_end != new.plan.task_end
        || old.workload != new.workload
        || old.cost_center_id != new.cost_center_id
        || old.cost_center_snapshot != new.cost_center_snapshot
        || old.coa_id != new.coa_id
        || old.coa_snapshot != new.coa_snapshot
}

/// `true` if the lists have different shapes or any aligned pair differs in
/// a derived field. Identity of the lists plays no part.
pub fn allocations_differ(old: &[Allocation], new: &[Allocation]) -> bool {
    old.len() != new.len()
        || old
            .iter()
            .zip(new)
            .any(|(old, new)| old.id != new.id || derived_fields_differ(old, new))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{CostCenterSnapshot, Money, Plan, RoleType};

    fn allocation() -> Allocation {
        Allocation {
            id: "alloc-1".to_string(),
            member_id: "member-1".to_string(),
            member_name: "Andi Pratama".to_string(),
            role: RoleType::Pm,
            task_id: "task-requirements".to_string(),
            task_name: "Requirement Gathering".to_string(),
            phase_id: "phase-analysis".to_string(),
            complexity: "Medium".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            plan: Plan::default(),
            workload: 5.0,
            cost_center_id: Some("cc-ops".to_string()),
            cost_center_snapshot: None,
            coa_id: None,
            coa_snapshot: None,
        }
    }

    #[test]
    fn equal_values_are_not_a_change() {
        let old = vec![allocation()];
        let new = old.clone();
        assert!(!allocations_differ(&old, &new));
    }

    #[test]
    fn non_derived_fields_are_ignored() {
        let old = vec![allocation()];
        let mut new = old.clone();
        new[0].member_name = "Andi P.".to_string();
        new[0].plan.duration_days = 9;
        assert!(!allocations_differ(&old, &new));
    }

    #[test]
    fn any_derived_field_is_a_change() {
        let old = vec![allocation()];

        let mut cost = old.clone();
        cost[0].plan.cost_project = Money::from_major(1);
        assert!(allocations_differ(&old, &cost));

        let mut snapshot = old.clone();
        snapshot[0].cost_center_snapshot = Some(CostCenterSnapshot {
            id: "cc-ops".to_string(),
            code: "OPS".to_string(),
            name: "Operations".to_string(),
            manager: "John Smith".to_string(),
            is_active: true,
        });
        assert!(allocations_differ(&old, &snapshot));

        let mut end = old.clone();
        end[0].plan.task_end = NaiveDate::from_ymd_opt(2026, 3, 6);
        assert!(allocations_differ(&old, &end));
    }

    #[test]
    fn shape_changes_are_a_change() {
        let old = vec![allocation()];
        assert!(allocations_differ(&old, &[]));

        let mut renumbered = old.clone();
        renumbered[0].id = "alloc-2".to_string();
        assert!(allocations_differ(&old, &renumbered));
    }
}
