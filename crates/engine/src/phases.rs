//! Phases (ordered stages of work) and the tasks they own.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub task_ids: Vec<String>,
    #[serde(default)]
    pub is_terminal: bool,
}

/// Template for allocations; belongs to exactly one [`Phase`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub phase_id: String,
    pub name: String,
    /// Default complexity level key for allocations created from this task.
    pub complexity: String,
}
