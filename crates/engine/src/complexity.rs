//! Complexity levels: duration in days, effort in hours and the derived
//! workload in man-days.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Hours in one man-day.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Complexity table keyed by level name.
pub type ComplexityTable = BTreeMap<String, ComplexityLevel>;

/// A complexity level.
///
/// `workload` is always `hours / 8`: it is recomputed by every constructor,
/// by [`set_hours`](ComplexityLevel::set_hours) and on deserialization, so a
/// stored workload that disagrees with its hours is ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawComplexityLevel")]
pub struct ComplexityLevel {
    days: u32,
    hours: f64,
    workload: f64,
}

#[derive(Deserialize)]
struct RawComplexityLevel {
    days: u32,
    hours: f64,
}

impl From<RawComplexityLevel> for ComplexityLevel {
    fn from(raw: RawComplexityLevel) -> Self {
        ComplexityLevel::new(raw.days, raw.hours)
    }
}

impl ComplexityLevel {
    #[must_use]
    pub fn new(days: u32, hours: f64) -> Self {
        Self {
            days,
            hours,
            workload: hours / HOURS_PER_DAY,
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    /// Workload in man-days.
    pub fn workload(&self) -> f64 {
        self.workload
    }

    pub fn set_days(&mut self, days: u32) {
        self.days = days;
    }

    pub fn set_hours(&mut self, hours: f64) {
        self.hours = hours;
        self.workload = hours / HOURS_PER_DAY;
    }

    /// Applies a partial edit; untouched fields keep their value.
    pub fn apply(&mut self, edit: &ComplexityEdit) {
        if let Some(days) = edit.days {
            self.set_days(days);
        }
        if let Some(hours) = edit.hours {
            self.set_hours(hours);
        }
    }
}

/// Partial edit of one complexity level, used by `UpdateComplexity`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityEdit {
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub hours: Option<f64>,
}

/// Shallow-merges `edits` into `table`. Unknown keys create a new level from
/// the edit, missing fields defaulting to zero.
pub fn merge_edits(table: &mut ComplexityTable, edits: &BTreeMap<String, ComplexityEdit>) {
    for (key, edit) in edits {
        table
            .entry(key.clone())
            .or_insert_with(|| ComplexityLevel::new(0, 0.0))
            .apply(edit);
    }
}

/// Overlays `stored` on top of `defaults` so levels added to the defaults
/// survive a load of older data.
#[must_use]
pub fn merge_under_defaults(defaults: ComplexityTable, stored: ComplexityTable) -> ComplexityTable {
    let mut merged = defaults;
    merged.extend(stored);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_hours_updates_workload() {
        let mut level = ComplexityLevel::new(5, 40.0);
        assert_eq!(level.workload(), 5.0);
        level.set_hours(56.0);
        assert_eq!(level.workload(), 7.0);
    }

    #[test]
    fn deserialization_ignores_stored_workload() {
        let level: ComplexityLevel =
            serde_json::from_str(r#"{"days":3,"hours":24,"workload":99}"#).unwrap();
        assert_eq!(level.workload(), 3.0);
    }

    #[test]
    fn merge_keeps_new_default_levels() {
        let mut defaults = ComplexityTable::new();
        defaults.insert("Low".to_string(), ComplexityLevel::new(1, 8.0));
        defaults.insert("Extreme".to_string(), ComplexityLevel::new(20, 160.0));
        let mut stored = ComplexityTable::new();
        stored.insert("Low".to_string(), ComplexityLevel::new(2, 12.0));

        let merged = merge_under_defaults(defaults, stored);
        assert_eq!(merged["Low"].hours(), 12.0);
        assert!(merged.contains_key("Extreme"));
    }

    #[test]
    fn partial_edit_only_touches_given_fields() {
        let mut table = ComplexityTable::new();
        table.insert("High".to_string(), ComplexityLevel::new(5, 40.0));
        let mut edits = BTreeMap::new();
        edits.insert(
            "High".to_string(),
            ComplexityEdit {
                days: None,
                hours: Some(56.0),
            },
        );
        merge_edits(&mut table, &edits);
        assert_eq!(table["High"].days(), 5);
        assert_eq!(table["High"].workload(), 7.0);
    }
}
