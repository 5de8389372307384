//! The single writer over the ledger state.
//!
//! [`Store::apply`] runs one intent through [`transition`], then the
//! post-commit hook: if any allocation input changed by value, the
//! allocations are recalculated and the result is kept only when the change
//! detector sees a real difference. The whole outcome is published as one
//! immutable [`Snapshot`].

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    Intent, LoadedState, ResultEngine, Snapshot,
    change::allocations_differ,
    ops::transition,
    recalc::{SnapshotPolicy, recalculate},
};

/// Source of `createdAt`/`updatedAt` stamps and of the current year.
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Issued by [`Store::begin_fetch`] for an external fetch whose result is
/// submitted later with [`Store::apply_fetched`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Outcome of an accepted intent.
#[derive(Clone, Debug)]
pub struct Transition {
    /// The published snapshot after the intent.
    pub snapshot: Arc<Snapshot>,
    /// Whether the published snapshot differs from the previous one.
    pub changed: bool,
    /// Whether recalculated allocations were committed.
    pub recalculated: bool,
}

#[derive(Debug)]
pub struct Store {
    snapshot: Arc<Snapshot>,
    clock: Arc<dyn Clock>,
    fetch_issued: u64,
    fetch_committed: u64,
}

impl Store {
    /// Return a builder for `Store`. Help to build the struct.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// The current published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Applies one intent. On error the published snapshot is untouched.
    pub fn apply(&mut self, intent: Intent) -> ResultEngine<Transition> {
        let label = intent.label();
        let force = matches!(intent, Intent::RecalculateAllocations);

        let mut next = match transition(&self.snapshot, intent, self.clock.now()) {
            Ok(next) => next,
            Err(err) => {
                debug!(intent = label, %err, "intent rejected");
                return Err(err);
            }
        };
        let recalculated = reconcile(&self.snapshot, &mut next, force);

        let changed = next != *self.snapshot;
        if changed {
            self.snapshot = Arc::new(next);
            debug!(intent = label, recalculated, "snapshot committed");
        } else {
            debug!(intent = label, "intent changed nothing");
        }

        Ok(Transition {
            snapshot: self.snapshot(),
            changed,
            recalculated,
        })
    }

    /// Replaces every collection with the loaded values merged over the
    /// built-in defaults.
    pub fn load(&mut self, loaded: LoadedState) -> ResultEngine<Transition> {
        let outcome = self.apply(Intent::Load(Box::new(loaded)))?;
        info!(
            allocations = outcome.snapshot.allocations.len(),
            cost_centers = outcome.snapshot.cost_centers.len(),
            "state loaded"
        );
        Ok(outcome)
    }

    /// Starts an external fetch. Tickets increase monotonically.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_issued += 1;
        FetchTicket(self.fetch_issued)
    }

    /// Applies the result of the fetch `ticket` unless a later fetch has
    /// already committed, in which case the result is dropped and `None`
    /// is returned.
    pub fn apply_fetched(
        &mut self,
        ticket: FetchTicket,
        intent: Intent,
    ) -> ResultEngine<Option<Transition>> {
        if ticket.0 <= self.fetch_committed {
            warn!(
                ticket = ticket.0,
                committed = self.fetch_committed,
                "stale fetch result discarded"
            );
            return Ok(None);
        }
        let outcome = self.apply(intent)?;
        self.fetch_committed = ticket.0;
        Ok(Some(outcome))
    }
}

/// Compares the collections allocations are derived from.
fn allocation_inputs_changed(old: &Snapshot, new: &Snapshot) -> bool {
    old.allocations != new.allocations
        || old.complexity != new.complexity
        || old.costs != new.costs
        || old.tasks != new.tasks
        || old.holidays != new.holidays
        || old.leaves != new.leaves
        || old.team_members != new.team_members
        || old.cost_centers != new.cost_centers
        || old.coa != new.coa
        || old.settings.cost_tracking != new.settings.cost_tracking
}

/// Post-commit hook. Returns whether recomputed allocations replaced the
/// committed ones.
fn reconcile(previous: &Snapshot, next: &mut Snapshot, force: bool) -> bool {
    if !force && !allocation_inputs_changed(previous, next) {
        return false;
    }
    let policy = if force {
        SnapshotPolicy::Refresh
    } else {
        SnapshotPolicy::for_settings(&next.settings)
    };

    let recomputed = recalculate(next, policy);
    if !allocations_differ(&next.allocations, &recomputed) {
        return false;
    }
    info!(allocations = recomputed.len(), ?policy, "allocations recalculated");
    next.allocations = recomputed;
    true
}

#[derive(Debug, Default)]
pub struct StoreBuilder {
    clock: Option<Arc<dyn Clock>>,
    snapshot: Option<Snapshot>,
}

impl StoreBuilder {
    /// Pass the clock used for timestamps.
    pub fn clock(mut self, clock: impl Clock + 'static) -> StoreBuilder {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Start from `snapshot` instead of the built-in defaults.
    pub fn snapshot(mut self, snapshot: Snapshot) -> StoreBuilder {
        self.snapshot = Some(snapshot);
        self
    }

    /// Construct `Store`
    pub fn build(self) -> Store {
        Store {
            snapshot: Arc::new(self.snapshot.unwrap_or_else(Snapshot::defaults)),
            clock: self
                .clock
                .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>),
            fetch_issued: 0,
            fetch_committed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::{CollectionIntent, ComplexityEdit, Holiday, HolidayCategory};

    fn store() -> Store {
        Store::builder()
            .clock(FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()))
            .build()
    }

    #[test]
    fn unknown_intent_changes_nothing() {
        let mut store = store();
        let before = store.snapshot();
        let transition = store.apply(Intent::Unknown).unwrap();
        assert!(!transition.changed);
        assert!(Arc::ptr_eq(&before, &transition.snapshot));
    }

    #[test]
    fn rejected_intent_keeps_published_snapshot() {
        let mut store = store();
        let before = store.snapshot();
        assert!(store.apply(Intent::delete_cost_center("cc-eng")).is_err());
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn complexity_edit_without_allocations_does_not_recalculate() {
        let mut store = store();
        let edits = [(
            "Medium".to_string(),
            ComplexityEdit {
                days: None,
                hours: Some(56.0),
            },
        )]
        .into_iter()
        .collect();
        let transition = store.apply(Intent::UpdateComplexity(edits)).unwrap();
        assert!(transition.changed);
        assert!(!transition.recalculated);
        assert_eq!(transition.snapshot.complexity["Medium"].workload(), 7.0);
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let mut store = store();
        let first = store.begin_fetch();
        let second = store.begin_fetch();
        let holiday = |day| {
            Holiday::new(
                format!("h-{day}"),
                NaiveDate::from_ymd_opt(2026, 5, day).unwrap(),
                "Holiday",
                HolidayCategory::National,
            )
        };

        let fresh = store
            .apply_fetched(
                second,
                Intent::Holidays(CollectionIntent::Set(vec![holiday(1)])),
            )
            .unwrap();
        assert!(fresh.is_some());

        let stale = store
            .apply_fetched(
                first,
                Intent::Holidays(CollectionIntent::Set(vec![holiday(14)])),
            )
            .unwrap();
        assert!(stale.is_none());
        assert_eq!(store.snapshot().holidays, vec![holiday(1)]);
    }
}
