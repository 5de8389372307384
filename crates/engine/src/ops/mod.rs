//! The transition function: `(snapshot, intent) -> snapshot`.
//!
//! Handlers work on a copy of the current snapshot and either return the
//! whole new snapshot or an error; a rejected intent never leaves a partial
//! write behind because the copy is simply dropped.

use chrono::{DateTime, Utc};

use crate::{Intent, ResultEngine, Snapshot, complexity::merge_edits};

mod coa;
mod collections;
mod cost_centers;

/// Applies one intent to `current`. `now` stamps `createdAt`/`updatedAt` and
/// bounds the budget-period year.
pub fn transition(
    current: &Snapshot,
    intent: Intent,
    now: DateTime<Utc>,
) -> ResultEngine<Snapshot> {
    let mut next = current.clone();
    match intent {
        Intent::Load(loaded) => next = loaded.merge_with_defaults(),
        Intent::ResetToDefaults => next = Snapshot::defaults(),
        Intent::TeamMembers(op) => collections::apply(&mut next.team_members, op),
        Intent::Phases(op) => collections::apply(&mut next.phases, op),
        Intent::Tasks(op) => collections::apply_tasks(&mut next, op),
        Intent::Costs(op) => collections::apply(&mut next.costs, op),
        Intent::Holidays(op) => collections::apply(&mut next.holidays, op),
        Intent::Leaves(op) => collections::apply(&mut next.leaves, op),
        Intent::Allocations(op) => collections::apply(&mut next.allocations, op),
        Intent::CostCenters(op) => cost_centers::apply(&mut next, op, now)?,
        Intent::Coa(op) => coa::apply(&mut next, op, now)?,
        Intent::SetComplexity(table) => next.complexity = table,
        Intent::UpdateComplexity(edits) => merge_edits(&mut next.complexity, &edits),
        Intent::SetSettings(settings) => next.settings = settings,
        Intent::UpdateSettings(patch) => next.settings.merge(&patch),
        Intent::RecalculateAllocations | Intent::Unknown => {}
    }
    Ok(next)
}
