use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use crate::{
    CostCenter, CostCenterInput, CostCenterIntent, EngineError, Money, ResultEngine, Snapshot,
    hierarchy::{self, MAX_DEPTH},
    util::{normalize_code, normalize_optional_text, resolve_id},
    validation::validate_cost_center,
};

pub(super) fn apply(
    next: &mut Snapshot,
    op: CostCenterIntent,
    now: DateTime<Utc>,
) -> ResultEngine<()> {
    match op {
        CostCenterIntent::Set(centers) => next.cost_centers = centers,
        CostCenterIntent::Add(input) => add(next, input, now)?,
        CostCenterIntent::Update { id, input } => update(next, &id, input, now)?,
        CostCenterIntent::Delete(id) => delete(next, &id)?,
    }
    Ok(())
}

/// Builds the committed record: trimmed text, upper-cased code.
fn build(
    id: String,
    input: &CostCenterInput,
    actuals: (Money, Money),
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> CostCenter {
    CostCenter {
        id,
        code: normalize_code(&input.code),
        name: input.name.trim().to_string(),
        description: normalize_optional_text(input.description.as_deref()),
        manager: input.manager.trim().to_string(),
        monthly_budget: input.monthly_budget,
        yearly_budget: input.yearly_budget,
        budget_period: normalize_optional_text(input.budget_period.as_deref()),
        parent_cost_center_id: normalize_optional_text(input.parent_cost_center_id.as_deref()),
        is_active: input.is_active,
        actual_monthly_cost: actuals.0,
        actual_yearly_cost: actuals.1,
        created_at,
        updated_at,
    }
}

fn add(next: &mut Snapshot, input: CostCenterInput, now: DateTime<Utc>) -> ResultEngine<()> {
    let mut violations = validate_cost_center(&input, &next.cost_centers, None, now.year());
    let id = resolve_id(input.id.as_deref());
    if next.cost_centers.iter().any(|center| center.id == id) {
        violations.push(format!("Cost center '{id}' already exists"));
    }
    EngineError::check(violations)?;

    let center = build(id, &input, (Money::ZERO, Money::ZERO), now, now);
    let mut post = next.cost_centers.clone();
    post.push(center);
    check_hierarchy(&post, &post[post.len() - 1])?;

    debug!(code = %post[post.len() - 1].code, "cost center added");
    next.cost_centers = post;
    Ok(())
}

/// Full replace of the caller-editable fields; actuals and `created_at` are
/// carried over from the stored record.
fn update(
    next: &mut Snapshot,
    id: &str,
    input: CostCenterInput,
    now: DateTime<Utc>,
) -> ResultEngine<()> {
    let existing = next
        .cost_centers
        .iter()
        .find(|center| center.id == id)
        .ok_or_else(|| EngineError::KeyNotFound(format!("cost center {id}")))?;

    EngineError::check(validate_cost_center(
        &input,
        &next.cost_centers,
        Some(id),
        now.year(),
    ))?;

    let center = build(
        id.to_string(),
        &input,
        (existing.actual_monthly_cost, existing.actual_yearly_cost),
        existing.created_at,
        now,
    );
    let post: Vec<CostCenter> = next
        .cost_centers
        .iter()
        .map(|current| {
            if current.id == id {
                center.clone()
            } else {
                current.clone()
            }
        })
        .collect();
    check_hierarchy(&post, &center)?;

    debug!(code = %center.code, "cost center updated");
    next.cost_centers = post;
    Ok(())
}

/// Parent, cycle and depth checks against the collection as it would look
/// after the change.
fn check_hierarchy(post: &[CostCenter], center: &CostCenter) -> ResultEngine<()> {
    let parent_id = center.parent_cost_center_id.as_deref();
    if parent_id.is_none() && hierarchy::max_subtree_depth(post, &center.id) <= MAX_DEPTH {
        return Ok(());
    }

    hierarchy::validate_parent(post, parent_id).map_err(EngineError::Hierarchy)?;
    if hierarchy::has_circular_reference(post, &center.id, parent_id) {
        return Err(EngineError::Hierarchy(format!(
            "Cost center '{}' cannot be its own ancestor",
            center.code
        )));
    }
    if hierarchy::max_subtree_depth(post, &center.id) > MAX_DEPTH {
        return Err(EngineError::Hierarchy(format!(
            "Cost center hierarchy cannot exceed {MAX_DEPTH} levels"
        )));
    }
    Ok(())
}

fn delete(next: &mut Snapshot, id: &str) -> ResultEngine<()> {
    let Some(center) = next.cost_centers.iter().find(|center| center.id == id) else {
        return Ok(());
    };

    let children = next
        .cost_centers
        .iter()
        .filter(|other| other.parent_cost_center_id.as_deref() == Some(id))
        .count();
    if children > 0 {
        return Err(EngineError::ReferentialIntegrity(format!(
            "Cannot delete cost center '{}': it has {children} child cost center(s)",
            center.code
        )));
    }

    let members = next
        .team_members
        .iter()
        .filter(|member| member.cost_center_id.as_deref() == Some(id))
        .count();
    if members > 0 {
        return Err(EngineError::ReferentialIntegrity(format!(
            "Cannot delete cost center '{}': it is assigned to {members} team member(s)",
            center.code
        )));
    }

    debug!(code = %center.code, "cost center deleted");
    next.cost_centers.retain(|center| center.id != id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn empty() -> Snapshot {
        Snapshot::default()
    }

    #[test]
    fn add_normalizes_and_stamps() {
        let mut snapshot = empty();
        let input = CostCenterInput {
            id: Some("cc-1".to_string()),
            description: Some("  ".to_string()),
            ..CostCenterInput::new(" eng-01 ", " Engineering ", "Jane Doe")
        };
        add(&mut snapshot, input, now()).unwrap();

        let center = &snapshot.cost_centers[0];
        assert_eq!(center.code, "ENG-01");
        assert_eq!(center.name, "Engineering");
        assert_eq!(center.description, None);
        assert_eq!(center.created_at, now());
        assert_eq!(center.updated_at, now());
    }

    #[test]
    fn update_keeps_actuals_and_created_at() {
        let mut snapshot = empty();
        let input = CostCenterInput {
            id: Some("cc-1".to_string()),
            ..CostCenterInput::new("ENG", "Engineering", "Jane Doe")
        };
        add(&mut snapshot, input.clone(), now()).unwrap();
        snapshot.cost_centers[0].actual_monthly_cost = Money::from_major(10);
        snapshot.cost_centers[0].actual_yearly_cost = Money::from_major(120);

        let later = now() + chrono::Duration::days(1);
        let renamed = CostCenterInput {
            name: "Platform Engineering".to_string(),
            ..input
        };
        update(&mut snapshot, "cc-1", renamed, later).unwrap();

        let center = &snapshot.cost_centers[0];
        assert_eq!(center.name, "Platform Engineering");
        assert_eq!(center.actual_monthly_cost, Money::from_major(10));
        assert_eq!(center.actual_yearly_cost, Money::from_major(120));
        assert_eq!(center.created_at, now());
        assert_eq!(center.updated_at, later);
    }

    #[test]
    fn update_missing_is_key_not_found() {
        let mut snapshot = empty();
        let err = update(
            &mut snapshot,
            "ghost",
            CostCenterInput::new("ENG", "Engineering", "Jane Doe"),
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::KeyNotFound(_)));
    }

    #[test]
    fn parent_cannot_be_self() {
        let mut snapshot = empty();
        let input = CostCenterInput {
            id: Some("cc-1".to_string()),
            ..CostCenterInput::new("ENG", "Engineering", "Jane Doe")
        };
        add(&mut snapshot, input.clone(), now()).unwrap();
        let err = update(&mut snapshot, "cc-1", input.parent("cc-1"), now()).unwrap_err();
        assert!(matches!(err, EngineError::Hierarchy(_)));
        assert_eq!(snapshot.cost_centers[0].parent_cost_center_id, None);
    }

    #[test]
    fn delete_missing_is_noop() {
        let mut snapshot = empty();
        delete(&mut snapshot, "ghost").unwrap();
        assert!(snapshot.cost_centers.is_empty());
    }
}
