//! Team members and the role vocabulary shared with cost tiers.

use serde::{Deserialize, Serialize};

/// Role a member plays; cost tiers and cost tracking are keyed by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleType {
    Ba,
    Pm,
    Fullstack,
    Backend,
    Frontend,
    Qa,
    Devops,
    Uiux,
}

impl RoleType {
    pub const ALL: [RoleType; 8] = [
        RoleType::Ba,
        RoleType::Pm,
        RoleType::Fullstack,
        RoleType::Backend,
        RoleType::Frontend,
        RoleType::Qa,
        RoleType::Devops,
        RoleType::Uiux,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RoleType::Ba => "BA",
            RoleType::Pm => "PM",
            RoleType::Fullstack => "FULLSTACK",
            RoleType::Backend => "BACKEND",
            RoleType::Frontend => "FRONTEND",
            RoleType::Qa => "QA",
            RoleType::Devops => "DEVOPS",
            RoleType::Uiux => "UIUX",
        }
    }
}

/// A team member that can be allocated to tasks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: RoleType,
    #[serde(default = "default_weekly_hours")]
    pub weekly_hours: u32,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub cost_tier_id: Option<String>,
    #[serde(default)]
    pub cost_center_id: Option<String>,
    #[serde(default)]
    pub default_coa_id: Option<String>,
}

impl TeamMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: RoleType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            weekly_hours: default_weekly_hours(),
            active: true,
            cost_tier_id: None,
            cost_center_id: None,
            default_coa_id: None,
        }
    }
}

fn default_weekly_hours() -> u32 {
    40
}

fn default_true() -> bool {
    true
}
