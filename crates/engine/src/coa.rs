//! Chart of accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoaCategory {
    Expense,
    Revenue,
    Asset,
    Liability,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coa {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: CoaCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoaInput {
    #[serde(default)]
    pub id: Option<String>,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: CoaCategory,
}

impl CoaInput {
    pub fn new(code: impl Into<String>, name: impl Into<String>, category: CoaCategory) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            description: None,
            category,
        }
    }
}

/// COA state captured onto an allocation at calculation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoaSnapshot {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category: CoaCategory,
}

impl From<&Coa> for CoaSnapshot {
    fn from(coa: &Coa) -> Self {
        Self {
            id: coa.id.clone(),
            code: coa.code.clone(),
            name: coa.name.clone(),
            category: coa.category,
        }
    }
}
