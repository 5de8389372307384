//! Recomputes every allocation's derived fields from the current snapshot.
//!
//! [`recalculate`] is total: an allocation whose inputs cannot be resolved is
//! returned as it was and the reason is logged.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;
use tracing::warn;

use crate::{
    Allocation, CoaSnapshot, CostCenterSnapshot, Leave, Money, Plan, Settings, Snapshot,
    costs::lowest_tier_for,
};

/// Working days in a month; a monthly rate divided by this is a day rate.
pub const WORKING_DAYS_PER_MONTH: f64 = 22.0;

/// Upper bound of calendar days scanned while looking for working days.
const MAX_SCAN_DAYS: u32 = 3660;

/// What to do with the cost-center/COA snapshots already on an allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotPolicy {
    /// Keep existing snapshots while the referenced ID is unchanged; fill
    /// missing ones.
    Preserve,
    /// Capture fresh snapshots for every allocation.
    Refresh,
}

impl SnapshotPolicy {
    /// Policy of an automatic recalculation under `settings`.
    pub fn for_settings(settings: &Settings) -> Self {
        if settings.cost_center.track_history {
            SnapshotPolicy::Preserve
        } else {
            SnapshotPolicy::Refresh
        }
    }
}

/// Why an allocation was left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("team member {0} not found")]
    Member(String),
    #[error("task {0} not found")]
    Task(String),
    #[error("complexity level {0} not found")]
    Complexity(String),
    #[error("cost tier {0} not found")]
    CostTier(String),
    #[error("cost center {0} not found")]
    CostCenter(String),
    #[error("COA {0} not found")]
    Coa(String),
    #[error("no working day within {MAX_SCAN_DAYS} days of {0}")]
    NoWorkingDays(NaiveDate),
}

/// Lookups shared by every allocation of one pass.
#[derive(Debug)]
pub struct PlanContext<'a> {
    snapshot: &'a Snapshot,
    holidays: HashSet<NaiveDate>,
}

impl<'a> PlanContext<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            holidays: snapshot.holidays.iter().map(|holiday| holiday.date).collect(),
        }
    }

    fn is_working_day(&self, date: NaiveDate, leaves: &[&Leave]) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            && !self.holidays.contains(&date)
            && !leaves.iter().any(|leave| leave.covers(date))
    }

    /// First working day on or after `start`, and the `days`-th working day
    /// counting that one as day 1. Zero days ends where it starts.
    pub fn schedule(
        &self,
        member_id: &str,
        start: NaiveDate,
        days: u32,
    ) -> Result<(NaiveDate, NaiveDate), PlanError> {
        let leaves: Vec<&Leave> = self
            .snapshot
            .leaves
            .iter()
            .filter(|leave| leave.member_id == member_id)
            .collect();

        let mut working = start
            .iter_days()
            .take(MAX_SCAN_DAYS as usize)
            .filter(|date| self.is_working_day(*date, &leaves));

        let task_start = working.next().ok_or(PlanError::NoWorkingDays(start))?;
        let task_end = match days {
            0 | 1 => task_start,
            _ => working
                .nth(days as usize - 2)
                .ok_or(PlanError::NoWorkingDays(start))?,
        };
        Ok((task_start, task_end))
    }
}

/// Calendar months touched by `[start, end]`, inclusive.
fn months_spanned(start: NaiveDate, end: NaiveDate) -> i64 {
    let index = |date: NaiveDate| i64::from(date.year()) * 12 + i64::from(date.month0());
    (index(end) - index(start) + 1).max(1)
}

/// Schedule and cost of `allocation` under the current snapshot.
pub fn compute_plan(allocation: &Allocation, ctx: &PlanContext<'_>) -> Result<Plan, PlanError> {
    let snapshot = ctx.snapshot;
    let member = snapshot
        .team_members
        .iter()
        .find(|member| member.id == allocation.member_id)
        .ok_or_else(|| PlanError::Member(allocation.member_id.clone()))?;
    let level = snapshot
        .complexity
        .get(&allocation.complexity)
        .ok_or_else(|| PlanError::Complexity(allocation.complexity.clone()))?;

    let rate = match member.cost_tier_id.as_deref() {
        Some(tier_id) => {
            snapshot
                .costs
                .iter()
                .find(|cost| cost.id == tier_id)
                .ok_or_else(|| PlanError::CostTier(tier_id.to_string()))?
                .rate
        }
        None => lowest_tier_for(&snapshot.costs, member.role)
            .map(|cost| cost.rate)
            .unwrap_or(Money::ZERO),
    };

    let (task_start, task_end) = ctx.schedule(&member.id, allocation.start_date, level.days())?;

    let (cost_project, cost_monthly) = if snapshot.settings.tracks_cost(member.role) {
        let project = rate.scale(level.workload() / WORKING_DAYS_PER_MONTH);
        (project, project.split(months_spanned(task_start, task_end)))
    } else {
        (Money::ZERO, Money::ZERO)
    };

    Ok(Plan {
        task_start: Some(task_start),
        task_end: Some(task_end),
        duration_days: level.days(),
        cost_monthly,
        cost_project,
    })
}

fn recompute(
    allocation: &Allocation,
    ctx: &PlanContext<'_>,
    policy: SnapshotPolicy,
) -> Result<Allocation, PlanError> {
    let snapshot = ctx.snapshot;
    if !snapshot.tasks.iter().any(|task| task.id == allocation.task_id) {
        return Err(PlanError::Task(allocation.task_id.clone()));
    }
    let plan = compute_plan(allocation, ctx)?;

    // compute_plan already resolved the member and the level
    let member = snapshot
        .team_members
        .iter()
        .find(|member| member.id == allocation.member_id)
        .ok_or_else(|| PlanError::Member(allocation.member_id.clone()))?;
    let workload = snapshot
        .complexity
        .get(&allocation.complexity)
        .map(|level| level.workload())
        .ok_or_else(|| PlanError::Complexity(allocation.complexity.clone()))?;

    let cost_center_id = member
        .cost_center_id
        .clone()
        .or_else(|| allocation.cost_center_id.clone());
    let cost_center_snapshot = match cost_center_id.as_deref() {
        None => None,
        Some(id) => {
            let keep = policy == SnapshotPolicy::Preserve
                && allocation.cost_center_id.as_deref() == Some(id)
                && allocation.cost_center_snapshot.is_some();
            if keep {
                allocation.cost_center_snapshot.clone()
            } else {
                let center = snapshot
                    .cost_centers
                    .iter()
                    .find(|center| center.id == id)
                    .ok_or_else(|| PlanError::CostCenter(id.to_string()))?;
                Some(CostCenterSnapshot::from(center))
            }
        }
    };

    let coa_id = allocation
        .coa_id
        .clone()
        .or_else(|| member.default_coa_id.clone());
    let coa_snapshot = match coa_id.as_deref() {
        None => None,
        Some(id) => {
            let keep = policy == SnapshotPolicy::Preserve
                && allocation.coa_id.as_deref() == Some(id)
                && allocation.coa_snapshot.is_some();
            if keep {
                allocation.coa_snapshot.clone()
            } else {
                let entry = snapshot
                    .coa
                    .iter()
                    .find(|entry| entry.id == id)
                    .ok_or_else(|| PlanError::Coa(id.to_string()))?;
                Some(CoaSnapshot::from(entry))
            }
        }
    };

    Ok(Allocation {
        plan,
        workload,
        cost_center_id,
        cost_center_snapshot,
        coa_id,
        coa_snapshot,
        ..allocation.clone()
    })
}

/// New allocation list with every derived field recomputed. Never fails.
pub fn recalculate(snapshot: &Snapshot, policy: SnapshotPolicy) -> Vec<Allocation> {
    let ctx = PlanContext::new(snapshot);
    snapshot
        .allocations
        .iter()
        .map(|allocation| match recompute(allocation, &ctx, policy) {
            Ok(updated) => updated,
            Err(reason) => {
                warn!(allocation = %allocation.id, %reason, "allocation left unchanged");
                allocation.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cost, Holiday, HolidayCategory, RoleType, change::allocations_differ};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn allocation(start: NaiveDate) -> Allocation {
        Allocation {
            id: "alloc-1".to_string(),
            member_id: "member-3".to_string(),
            member_name: "Budi Santoso".to_string(),
            role: RoleType::Backend,
            task_id: "task-backend".to_string(),
            task_name: "Backend Development".to_string(),
            phase_id: "phase-development".to_string(),
            complexity: "Medium".to_string(),
            start_date: start,
            plan: Plan::default(),
            workload: 0.0,
            cost_center_id: None,
            cost_center_snapshot: None,
            coa_id: None,
            coa_snapshot: None,
        }
    }

    fn snapshot_with(allocations: Vec<Allocation>) -> Snapshot {
        Snapshot {
            holidays: Vec::new(),
            allocations,
            ..Snapshot::defaults()
        }
    }

    #[test]
    fn schedule_skips_weekends_holidays_and_leaves() {
        let mut snapshot = snapshot_with(Vec::new());
        // Monday 2026-03-02 .. Friday 2026-03-06
        snapshot.holidays = vec![Holiday::new(
            "h-1",
            date(2026, 3, 3),
            "Day of Silence",
            HolidayCategory::National,
        )];
        snapshot.leaves = vec![Leave {
            id: "leave-1".to_string(),
            member_id: "member-3".to_string(),
            member_name: "Budi Santoso".to_string(),
            start_date: date(2026, 3, 5),
            end_date: date(2026, 3, 6),
        }];
        let ctx = PlanContext::new(&snapshot);

        // Saturday start rolls to Monday
        let (start, end) = ctx.schedule("member-3", date(2026, 2, 28), 3).unwrap();
        assert_eq!(start, date(2026, 3, 2));
        assert_eq!(end, date(2026, 3, 9));

        let (start, end) = ctx.schedule("member-1", date(2026, 3, 2), 3).unwrap();
        assert_eq!((start, end), (date(2026, 3, 2), date(2026, 3, 5)));

        let (start, end) = ctx.schedule("member-1", date(2026, 3, 2), 0).unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn cost_follows_tier_rate_and_workload() {
        let snapshot = snapshot_with(vec![allocation(date(2026, 3, 2))]);
        let ctx = PlanContext::new(&snapshot);
        let plan = compute_plan(&snapshot.allocations[0], &ctx).unwrap();

        // senior backend, Medium = 40h = 5 man-days
        let expected = Money::from_major(24_000_000).scale(5.0 / 22.0);
        assert_eq!(plan.cost_project, expected);
        assert_eq!(plan.cost_monthly, expected);
        assert_eq!(plan.task_end, Some(date(2026, 3, 6)));
        assert_eq!(plan.duration_days, 5);
    }

    #[test]
    fn monthly_cost_spreads_over_months_spanned() {
        let snapshot = snapshot_with(vec![allocation(date(2026, 3, 30))]);
        let ctx = PlanContext::new(&snapshot);
        let plan = compute_plan(&snapshot.allocations[0], &ctx).unwrap();

        assert_eq!(plan.task_end, Some(date(2026, 4, 3)));
        assert_eq!(plan.cost_monthly, plan.cost_project.split(2));
    }

    #[test]
    fn untracked_role_costs_nothing() {
        let mut snapshot = snapshot_with(vec![allocation(date(2026, 3, 2))]);
        snapshot.settings.cost_tracking.insert(RoleType::Backend, false);
        let ctx = PlanContext::new(&snapshot);
        let plan = compute_plan(&snapshot.allocations[0], &ctx).unwrap();
        assert_eq!(plan.cost_project, Money::ZERO);
        assert_eq!(plan.cost_monthly, Money::ZERO);
    }

    #[test]
    fn member_without_tier_uses_lowest_tier_of_role() {
        let mut snapshot = snapshot_with(vec![allocation(date(2026, 3, 2))]);
        snapshot.team_members[2].cost_tier_id = None;
        snapshot.costs.push(Cost {
            id: "cost-backend-0".to_string(),
            role: RoleType::Backend,
            tier_level: 0,
            resource_name: "Intern Backend".to_string(),
            rate: Money::from_major(2_200_000),
        });
        let ctx = PlanContext::new(&snapshot);
        let plan = compute_plan(&snapshot.allocations[0], &ctx).unwrap();
        assert_eq!(plan.cost_project, Money::from_major(500_000));
    }

    #[test]
    fn dangling_reference_leaves_allocation_unchanged() {
        let mut ghost = allocation(date(2026, 3, 2));
        ghost.member_id = "ghost".to_string();
        let snapshot = snapshot_with(vec![ghost.clone()]);
        let recomputed = recalculate(&snapshot, SnapshotPolicy::Refresh);
        assert_eq!(recomputed, vec![ghost]);
    }

    #[test]
    fn snapshots_resolved_from_member_and_preserved() {
        let snapshot = snapshot_with(vec![allocation(date(2026, 3, 2))]);
        let first = recalculate(&snapshot, SnapshotPolicy::Preserve);
        assert_eq!(first[0].cost_center_id.as_deref(), Some("cc-eng"));
        assert_eq!(first[0].coa_id.as_deref(), Some("coa-salaries"));
        assert_eq!(first[0].cost_center_snapshot.as_ref().unwrap().code, "ENG");

        let mut renamed = Snapshot {
            allocations: first.clone(),
            ..snapshot
        };
        renamed.cost_centers[0].name = "Platform".to_string();

        let preserved = recalculate(&renamed, SnapshotPolicy::Preserve);
        assert_eq!(preserved[0].cost_center_snapshot.as_ref().unwrap().name, "Engineering");

        let refreshed = recalculate(&renamed, SnapshotPolicy::Refresh);
        assert_eq!(refreshed[0].cost_center_snapshot.as_ref().unwrap().name, "Platform");
    }

    #[test]
    fn recompute_is_idempotent() {
        let snapshot = snapshot_with(vec![allocation(date(2026, 3, 2))]);
        for policy in [SnapshotPolicy::Preserve, SnapshotPolicy::Refresh] {
            let once = recalculate(&snapshot, policy);
            let again = recalculate(
                &Snapshot {
                    allocations: once.clone(),
                    ..snapshot.clone()
                },
                policy,
            );
            assert!(!allocations_differ(&once, &again));
        }
    }
}
