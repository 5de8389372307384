//! Graph queries over the cost-center parent relation.
//!
//! All walks are bounded, so they terminate even on corrupt data that
//! already contains a cycle.

use std::collections::HashSet;

use crate::CostCenter;

/// Deepest allowed level; a root has depth 1.
pub const MAX_DEPTH: usize = 5;
/// Hard cap on hops when walking parents.
pub const MAX_WALK: usize = 10;

fn find<'a>(centers: &'a [CostCenter], id: &str) -> Option<&'a CostCenter> {
    centers.iter().find(|center| center.id == id)
}

/// Returns `true` if making `parent_id` the parent of `id` would close a
/// cycle.
///
/// No parent never forms a cycle. A parent that is missing from `centers`
/// is reported as circular, since the chain cannot be proven to terminate.
pub fn has_circular_reference(centers: &[CostCenter], id: &str, parent_id: Option<&str>) -> bool {
    let Some(parent_id) = parent_id else {
        return false;
    };
    if parent_id == id || find(centers, parent_id).is_none() {
        return true;
    }

    let mut visited = HashSet::new();
    let mut current = Some(parent_id);
    while let Some(node) = current {
        if node == id || !visited.insert(node) {
            return true;
        }
        current = find(centers, node).and_then(|center| center.parent_cost_center_id.as_deref());
    }
    false
}

/// Number of levels from the root down to `id`, inclusive. The walk stops
/// after [`MAX_WALK`] hops.
pub fn hierarchy_depth(centers: &[CostCenter], id: &str) -> usize {
    let mut depth = 1;
    let mut current = find(centers, id).and_then(|center| center.parent_cost_center_id.as_deref());
    while let Some(parent_id) = current {
        if depth >= MAX_WALK {
            break;
        }
        depth += 1;
        current = find(centers, parent_id).and_then(|center| center.parent_cost_center_id.as_deref());
    }
    depth
}

/// A missing parent reference is valid; otherwise the parent must exist and
/// be active.
pub fn validate_parent(centers: &[CostCenter], parent_id: Option<&str>) -> Result<(), String> {
    let Some(parent_id) = parent_id else {
        return Ok(());
    };
    match find(centers, parent_id) {
        None => Err(format!("Parent cost center '{parent_id}' does not exist")),
        Some(parent) if !parent.is_active => Err(format!(
            "Parent cost center '{}' is inactive",
            parent.code
        )),
        Some(_) => Ok(()),
    }
}

/// IDs of `id` and every center below it.
pub fn subtree(centers: &[CostCenter], id: &str) -> Vec<String> {
    let mut out = vec![id.to_string()];
    let mut cursor = 0;
    while cursor < out.len() && out.len() <= centers.len() {
        let current = out[cursor].clone();
        for child in centers
            .iter()
            .filter(|center| center.parent_cost_center_id.as_deref() == Some(current.as_str()))
        {
            if !out.contains(&child.id) {
                out.push(child.id.clone());
            }
        }
        cursor += 1;
    }
    out
}

/// Deepest level reached by `id` or any of its descendants.
pub fn max_subtree_depth(centers: &[CostCenter], id: &str) -> usize {
    subtree(centers, id)
        .iter()
        .map(|node| hierarchy_depth(centers, node))
        .max()
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::Money;

    fn center(id: &str, parent: Option<&str>, active: bool) -> CostCenter {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        CostCenter {
            id: id.to_string(),
            code: id.to_uppercase(),
            name: format!("Center {id}"),
            description: None,
            manager: "Jane Doe".to_string(),
            monthly_budget: None,
            yearly_budget: None,
            budget_period: None,
            parent_cost_center_id: parent.map(ToString::to_string),
            is_active: active,
            actual_monthly_cost: Money::ZERO,
            actual_yearly_cost: Money::ZERO,
            created_at: at,
            updated_at: at,
        }
    }

    fn chain() -> Vec<CostCenter> {
        vec![
            center("a", None, true),
            center("b", Some("a"), true),
            center("c", Some("b"), true),
        ]
    }

    #[test]
    fn depth_counts_root_as_one() {
        let centers = chain();
        assert_eq!(hierarchy_depth(&centers, "a"), 1);
        assert_eq!(hierarchy_depth(&centers, "c"), 3);
    }

    #[test]
    fn depth_is_bounded_on_corrupt_cycles() {
        let centers = vec![center("x", Some("y"), true), center("y", Some("x"), true)];
        assert_eq!(hierarchy_depth(&centers, "x"), MAX_WALK);
    }

    #[test]
    fn cycle_detection() {
        let centers = chain();
        assert!(!has_circular_reference(&centers, "c", None));
        assert!(has_circular_reference(&centers, "a", Some("a")));
        assert!(has_circular_reference(&centers, "a", Some("c")));
        assert!(!has_circular_reference(&centers, "c", Some("a")));
        assert!(has_circular_reference(&centers, "c", Some("ghost")));
    }

    #[test]
    fn cycle_detection_terminates_on_corrupt_data() {
        let centers = vec![center("x", Some("y"), true), center("y", Some("x"), true)];
        assert!(has_circular_reference(&centers, "z", Some("x")));
    }

    #[test]
    fn parent_must_exist_and_be_active() {
        let mut centers = chain();
        centers.push(center("off", None, false));
        assert!(validate_parent(&centers, None).is_ok());
        assert!(validate_parent(&centers, Some("a")).is_ok());
        assert!(validate_parent(&centers, Some("ghost")).is_err());
        assert_eq!(
            validate_parent(&centers, Some("off")),
            Err("Parent cost center 'OFF' is inactive".to_string())
        );
    }

    #[test]
    fn subtree_depth_includes_descendants() {
        let centers = chain();
        assert_eq!(subtree(&centers, "b"), vec!["b", "c"]);
        assert_eq!(max_subtree_depth(&centers, "a"), 3);
    }
}
