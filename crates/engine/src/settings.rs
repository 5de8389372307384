//! Ledger-wide settings and their shallow-merge patch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Currency, RoleType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

/// Cost-center policy toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterPolicy {
    pub require_manager_approval: bool,
    pub allow_bulk_assignment: bool,
    /// Keep the cost-center/COA snapshots already captured on allocations
    /// during automatic recalculation.
    pub track_history: bool,
}

impl Default for CostCenterPolicy {
    fn default() -> Self {
        Self {
            require_manager_approval: false,
            allow_bulk_assignment: true,
            track_history: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub theme: Theme,
    /// Per-role cost tracking; a role missing from the map is tracked.
    #[serde(default)]
    pub cost_tracking: BTreeMap<RoleType, bool>,
    #[serde(default)]
    pub cost_center: CostCenterPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            theme: Theme::default(),
            cost_tracking: RoleType::ALL.iter().map(|role| (*role, true)).collect(),
            cost_center: CostCenterPolicy::default(),
        }
    }
}

impl Settings {
    pub fn tracks_cost(&self, role: RoleType) -> bool {
        self.cost_tracking.get(&role).copied().unwrap_or(true)
    }

    /// Shallow merge: every `Some` field of the patch replaces the current
    /// value; `cost_tracking` entries are merged per role.
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(tracking) = &patch.cost_tracking {
            self.cost_tracking
                .extend(tracking.iter().map(|(role, on)| (*role, *on)));
        }
        if let Some(policy) = patch.cost_center {
            self.cost_center = policy;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub cost_tracking: Option<BTreeMap<RoleType, bool>>,
    #[serde(default)]
    pub cost_center: Option<CostCenterPolicy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_only_touches_given_fields() {
        let mut settings = Settings::default();
        let mut tracking = BTreeMap::new();
        tracking.insert(RoleType::Qa, false);
        settings.merge(&SettingsPatch {
            theme: Some(Theme::Dark),
            cost_tracking: Some(tracking),
            ..SettingsPatch::default()
        });

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.currency, Currency::Idr);
        assert!(!settings.tracks_cost(RoleType::Qa));
        assert!(settings.tracks_cost(RoleType::Backend));
    }
}
