//! The state snapshot: every collection at one point in logical time, plus
//! the load/export shapes used by external persistence.

use serde::{Deserialize, Serialize};

use crate::{
    Allocation, Coa, ComplexityTable, Cost, CostCenter, Holiday, Leave, Phase, Settings, Task,
    TeamMember, complexity::merge_under_defaults, defaults,
};

/// Immutable once published by the [`Store`](crate::Store).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub team_members: Vec<TeamMember>,
    pub phases: Vec<Phase>,
    pub tasks: Vec<Task>,
    pub complexity: ComplexityTable,
    pub costs: Vec<Cost>,
    pub holidays: Vec<Holiday>,
    pub leaves: Vec<Leave>,
    pub allocations: Vec<Allocation>,
    pub cost_centers: Vec<CostCenter>,
    pub coa: Vec<Coa>,
    pub settings: Settings,
}

/// Top-level keys persisted by external writers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    TeamMembers,
    Phases,
    Tasks,
    Complexity,
    Costs,
    Holidays,
    Leaves,
    Allocations,
    CostCenters,
    Coa,
    Settings,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 11] = [
        CollectionKey::TeamMembers,
        CollectionKey::Phases,
        CollectionKey::Tasks,
        CollectionKey::Complexity,
        CollectionKey::Costs,
        CollectionKey::Holidays,
        CollectionKey::Leaves,
        CollectionKey::Allocations,
        CollectionKey::CostCenters,
        CollectionKey::Coa,
        CollectionKey::Settings,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CollectionKey::TeamMembers => "teamMembers",
            CollectionKey::Phases => "phases",
            CollectionKey::Tasks => "tasks",
            CollectionKey::Complexity => "complexity",
            CollectionKey::Costs => "costs",
            CollectionKey::Holidays => "holidays",
            CollectionKey::Leaves => "leaves",
            CollectionKey::Allocations => "allocations",
            CollectionKey::CostCenters => "costCenters",
            CollectionKey::Coa => "coa",
            CollectionKey::Settings => "settings",
        }
    }
}

impl TryFrom<&str> for CollectionKey {
    type Error = crate::EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        CollectionKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| crate::EngineError::KeyNotFound(value.to_string()))
    }
}

impl Snapshot {
    /// Built-in seed data, with leaves and allocations empty.
    pub fn defaults() -> Self {
        Self {
            team_members: defaults::team_members(),
            phases: defaults::phases(),
            tasks: defaults::tasks(),
            complexity: defaults::complexity(),
            costs: defaults::costs(),
            holidays: defaults::holidays(),
            leaves: Vec::new(),
            allocations: Vec::new(),
            cost_centers: defaults::cost_centers(),
            coa: defaults::coa(),
            settings: Settings::default(),
        }
    }

    /// JSON value of one collection.
    pub fn export_one(&self, key: CollectionKey) -> serde_json::Result<serde_json::Value> {
        match key {
            CollectionKey::TeamMembers => serde_json::to_value(&self.team_members),
            CollectionKey::Phases => serde_json::to_value(&self.phases),
            CollectionKey::Tasks => serde_json::to_value(&self.tasks),
            CollectionKey::Complexity => serde_json::to_value(&self.complexity),
            CollectionKey::Costs => serde_json::to_value(&self.costs),
            CollectionKey::Holidays => serde_json::to_value(&self.holidays),
            CollectionKey::Leaves => serde_json::to_value(&self.leaves),
            CollectionKey::Allocations => serde_json::to_value(&self.allocations),
            CollectionKey::CostCenters => serde_json::to_value(&self.cost_centers),
            CollectionKey::Coa => serde_json::to_value(&self.coa),
            CollectionKey::Settings => serde_json::to_value(&self.settings),
        }
    }

    /// Committed value of each of the eleven top-level collections.
    pub fn export(&self) -> serde_json::Result<Vec<(CollectionKey, serde_json::Value)>> {
        CollectionKey::ALL
            .into_iter()
            .map(|key| self.export_one(key).map(|value| (key, value)))
            .collect()
    }
}

/// Per-collection values supplied by an external loader; `None` = absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadedState {
    pub team_members: Option<Vec<TeamMember>>,
    pub phases: Option<Vec<Phase>>,
    pub tasks: Option<Vec<Task>>,
    pub complexity: Option<ComplexityTable>,
    pub costs: Option<Vec<Cost>>,
    pub holidays: Option<Vec<Holiday>>,
    pub leaves: Option<Vec<Leave>>,
    pub allocations: Option<Vec<Allocation>>,
    pub cost_centers: Option<Vec<CostCenter>>,
    pub coa: Option<Vec<Coa>>,
    pub settings: Option<Settings>,
}

impl LoadedState {
    /// Parses a raw persisted value into its slot.
    pub fn insert_raw(
        &mut self,
        key: CollectionKey,
        value: serde_json::Value,
    ) -> serde_json::Result<()> {
        match key {
            CollectionKey::TeamMembers => self.team_members = Some(serde_json::from_value(value)?),
            CollectionKey::Phases => self.phases = Some(serde_json::from_value(value)?),
            CollectionKey::Tasks => self.tasks = Some(serde_json::from_value(value)?),
            CollectionKey::Complexity => self.complexity = Some(serde_json::from_value(value)?),
            CollectionKey::Costs => self.costs = Some(serde_json::from_value(value)?),
            CollectionKey::Holidays => self.holidays = Some(serde_json::from_value(value)?),
            CollectionKey::Leaves => self.leaves = Some(serde_json::from_value(value)?),
            CollectionKey::Allocations => self.allocations = Some(serde_json::from_value(value)?),
            CollectionKey::CostCenters => {
                self.cost_centers = Some(serde_json::from_value(value)?)
            }
            CollectionKey::Coa => self.coa = Some(serde_json::from_value(value)?),
            CollectionKey::Settings => self.settings = Some(serde_json::from_value(value)?),
        }
        Ok(())
    }

    /// Absent collections take the default; the complexity table keeps
    /// default levels the stored table does not know about.
    pub fn merge_with_defaults(self) -> Snapshot {
        let defaults = Snapshot::defaults();
        Snapshot {
            team_members: self.team_members.unwrap_or(defaults.team_members),
            phases: self.phases.unwrap_or(defaults.phases),
            tasks: self.tasks.unwrap_or(defaults.tasks),
            complexity: match self.complexity {
                Some(stored) => merge_under_defaults(defaults.complexity, stored),
                None => defaults.complexity,
            },
            costs: self.costs.unwrap_or(defaults.costs),
            holidays: self.holidays.unwrap_or(defaults.holidays),
            leaves: self.leaves.unwrap_or(defaults.leaves),
            allocations: self.allocations.unwrap_or(defaults.allocations),
            cost_centers: self.cost_centers.unwrap_or(defaults.cost_centers),
            coa: self.coa.unwrap_or(defaults.coa),
            settings: self.settings.unwrap_or(defaults.settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_covers_all_keys() {
        let exported = Snapshot::defaults().export().unwrap();
        assert_eq!(exported.len(), 11);
        assert_eq!(exported[0].0.as_str(), "teamMembers");
        assert_eq!(exported[10].0, CollectionKey::Settings);
    }

    #[test]
    fn absent_collections_take_defaults() {
        let loaded = LoadedState {
            leaves: Some(Vec::new()),
            cost_centers: Some(Vec::new()),
            ..LoadedState::default()
        };
        let snapshot = loaded.merge_with_defaults();
        assert!(snapshot.cost_centers.is_empty());
        assert_eq!(snapshot.coa, crate::defaults::coa());
        assert_eq!(snapshot.complexity, crate::defaults::complexity());
    }

    #[test]
    fn raw_values_round_into_slots() {
        let mut loaded = LoadedState::default();
        loaded
            .insert_raw(
                CollectionKey::Complexity,
                serde_json::json!({"Low": {"days": 1, "hours": 4}}),
            )
            .unwrap();
        let snapshot = loaded.merge_with_defaults();
        assert_eq!(snapshot.complexity["Low"].workload(), 0.5);
        assert!(snapshot.complexity.contains_key("High"));
    }

    #[test]
    fn collection_key_parses() {
        assert_eq!(
            CollectionKey::try_from("costCenters"),
            Ok(CollectionKey::CostCenters)
        );
        assert!(CollectionKey::try_from("nope").is_err());
    }
}
