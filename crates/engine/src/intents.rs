//! Intents: the closed set of mutations the [`Store`] accepts.
//!
//! Intents are data only. Each entity family gets its own variant set, so a
//! handler never matches on free-form strings. The JSON form is adjacently
//! tagged:
//!
//! ```json
//! {"type": "COST_CENTERS", "payload": {"op": "ADD", "data": {"code": "eng-01", ...}}}
//! ```
//!
//! [`Store`]: crate::Store

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{
    Allocation, Coa, CoaInput, ComplexityEdit, ComplexityTable, Cost, CostCenter,
    CostCenterInput, Holiday, Leave, LoadedState, Phase, Settings, SettingsPatch, Task,
    TeamMember,
};

/// Records addressable by ID inside a collection.
pub trait Keyed {
    fn key(&self) -> &str;
}

macro_rules! keyed {
    ($($ty:ty),* $(,)?) => {
        $(impl Keyed for $ty {
            fn key(&self) -> &str {
                &self.id
            }
        })*
    };
}

keyed!(TeamMember, Phase, Task, Cost, Holiday, Leave, Allocation, CostCenter, Coa);

/// Plain collection mutations, applied without validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionIntent<T> {
    /// Bulk replace.
    Set(Vec<T>),
    Add(T),
    /// Full-record replace by ID; a missing ID is a no-op.
    Update(T),
    /// A missing ID is a no-op.
    Delete(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostCenterIntent {
    Set(Vec<CostCenter>),
    Add(CostCenterInput),
    Update { id: String, input: CostCenterInput },
    Delete(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoaIntent {
    Set(Vec<Coa>),
    Add(CoaInput),
    Update { id: String, input: CoaInput },
    Delete(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    remote = "Self",
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum Intent {
    /// Bulk multi-collection replace used at startup.
    Load(Box<LoadedState>),
    /// Seed data everywhere, leaves and allocations cleared.
    ResetToDefaults,
    TeamMembers(CollectionIntent<TeamMember>),
    Phases(CollectionIntent<Phase>),
    Tasks(CollectionIntent<Task>),
    Costs(CollectionIntent<Cost>),
    Holidays(CollectionIntent<Holiday>),
    Leaves(CollectionIntent<Leave>),
    Allocations(CollectionIntent<Allocation>),
    CostCenters(CostCenterIntent),
    Coa(CoaIntent),
    SetComplexity(ComplexityTable),
    /// Shallow merge into the complexity table.
    UpdateComplexity(BTreeMap<String, ComplexityEdit>),
    SetSettings(Settings),
    /// Shallow merge into the settings.
    UpdateSettings(SettingsPatch),
    /// Explicit recalculation pass; refreshes allocation snapshots.
    RecalculateAllocations,
    /// Any tag this build does not know, whatever its payload. Applying it
    /// changes nothing.
    #[serde(skip_deserializing)]
    Unknown,
}

/// Tags [`Intent`] deserializes; anything else becomes [`Intent::Unknown`].
const KNOWN_TAGS: [&str; 16] = [
    "LOAD",
    "RESET_TO_DEFAULTS",
    "TEAM_MEMBERS",
    "PHASES",
    "TASKS",
    "COSTS",
    "HOLIDAYS",
    "LEAVES",
    "ALLOCATIONS",
    "COST_CENTERS",
    "COA",
    "SET_COMPLEXITY",
    "UPDATE_COMPLEXITY",
    "SET_SETTINGS",
    "UPDATE_SETTINGS",
    "RECALCULATE_ALLOCATIONS",
];

impl Serialize for Intent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Intent::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value.get("type").and_then(serde_json::Value::as_str) {
            Some(tag) if !KNOWN_TAGS.contains(&tag) => Ok(Intent::Unknown),
            _ => Intent::deserialize(value).map_err(de::Error::custom),
        }
    }
}

impl Intent {
    pub fn set_holidays(holidays: Vec<Holiday>) -> Self {
        Intent::Holidays(CollectionIntent::Set(holidays))
    }

    pub fn add_cost_center(input: CostCenterInput) -> Self {
        Intent::CostCenters(CostCenterIntent::Add(input))
    }

    pub fn update_cost_center(id: impl Into<String>, input: CostCenterInput) -> Self {
        Intent::CostCenters(CostCenterIntent::Update {
            id: id.into(),
            input,
        })
    }

    pub fn delete_cost_center(id: impl Into<String>) -> Self {
        Intent::CostCenters(CostCenterIntent::Delete(id.into()))
    }

    pub fn add_coa(input: CoaInput) -> Self {
        Intent::Coa(CoaIntent::Add(input))
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Load(_) => "LOAD",
            Intent::ResetToDefaults => "RESET_TO_DEFAULTS",
            Intent::TeamMembers(_) => "TEAM_MEMBERS",
            Intent::Phases(_) => "PHASES",
            Intent::Tasks(_) => "TASKS",
            Intent::Costs(_) => "COSTS",
            Intent::Holidays(_) => "HOLIDAYS",
            Intent::Leaves(_) => "LEAVES",
            Intent::Allocations(_) => "ALLOCATIONS",
            Intent::CostCenters(_) => "COST_CENTERS",
            Intent::Coa(_) => "COA",
            Intent::SetComplexity(_) => "SET_COMPLEXITY",
            Intent::UpdateComplexity(_) => "UPDATE_COMPLEXITY",
            Intent::SetSettings(_) => "SET_SETTINGS",
            Intent::UpdateSettings(_) => "UPDATE_SETTINGS",
            Intent::RecalculateAllocations => "RECALCULATE_ALLOCATIONS",
            Intent::Unknown => "UNKNOWN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_adjacently_tagged_json() {
        let intent: Intent = serde_json::from_str(
            r#"{"type":"COST_CENTERS","payload":{"op":"ADD","data":{"code":"eng-01","name":"Engineering","manager":"Jane Doe"}}}"#,
        )
        .unwrap();
        let Intent::CostCenters(CostCenterIntent::Add(input)) = intent else {
            panic!("unexpected intent");
        };
        assert_eq!(input.code, "eng-01");
        assert!(input.is_active);
    }

    #[test]
    fn unknown_tag_is_absorbed() {
        let intent: Intent = serde_json::from_str(r#"{"type":"SET_FOO"}"#).unwrap();
        assert_eq!(intent, Intent::Unknown);
    }

    #[test]
    fn unknown_tag_with_payload_is_absorbed() {
        for raw in [
            r#"{"type":"SET_FOO","payload":{"x":1}}"#,
            r#"{"type":"ARCHIVE_PROJECT","payload":{"op":"ADD","data":{"id":"p-1"}}}"#,
            r#"{"type":"BULK_IMPORT","payload":[1,2,3]}"#,
        ] {
            let intent: Intent = serde_json::from_str(raw).unwrap();
            assert_eq!(intent, Intent::Unknown, "{raw}");
        }
    }

    #[test]
    fn known_tag_with_bad_payload_is_an_error() {
        let parsed = serde_json::from_str::<Intent>(r#"{"type":"COST_CENTERS","payload":{"op":"ADD"}}"#);
        assert!(parsed.is_err());
        assert!(serde_json::from_str::<Intent>(r#"{"payload":{}}"#).is_err());
    }

    #[test]
    fn labels_match_the_wire_tags() {
        let intents = [
            Intent::ResetToDefaults,
            Intent::RecalculateAllocations,
            Intent::add_cost_center(CostCenterInput::new("ENG", "Engineering", "Jane Doe")),
            Intent::set_holidays(Vec::new()),
        ];
        for intent in intents {
            let value = serde_json::to_value(&intent).unwrap();
            assert_eq!(value["type"], intent.label());
            assert!(KNOWN_TAGS.contains(&intent.label()));
            assert_eq!(serde_json::from_value::<Intent>(value).unwrap(), intent);
        }
    }

    #[test]
    fn unknown_intents_inside_a_batch_do_not_reject_it() {
        let batch: Vec<Intent> = serde_json::from_str(
            r#"[
                {"type":"SET_FOO","payload":{"x":1}},
                {"type":"RECALCULATE_ALLOCATIONS"}
            ]"#,
        )
        .unwrap();
        assert_eq!(batch, [Intent::Unknown, Intent::RecalculateAllocations]);
    }

    #[test]
    fn unit_variant_without_payload() {
        let intent: Intent = serde_json::from_str(r#"{"type":"RESET_TO_DEFAULTS"}"#).unwrap();
        assert_eq!(intent, Intent::ResetToDefaults);
    }
}
