//! Resource cost tiers (rate cards).

use serde::{Deserialize, Serialize};

use crate::{Money, RoleType};

/// A rate card for one role and tier. `rate` is the monthly rate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cost {
    pub id: String,
    pub role: RoleType,
    pub tier_level: u8,
    pub resource_name: String,
    pub rate: Money,
}

/// Lowest-tier cost for `role`, if any.
pub fn lowest_tier_for(costs: &[Cost], role: RoleType) -> Option<&Cost> {
    costs
        .iter()
        .filter(|cost| cost.role == role)
        .min_by_key(|cost| cost.tier_level)
}
