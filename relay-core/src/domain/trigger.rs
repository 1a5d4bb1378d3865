//! Trigger domain model
//!
//! Describes which workflow to start and with what inputs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The workflow a dispatch is aimed at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTarget {
    /// Account or organization owning the repository
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Workflow numeric id or file name (e.g. `deploy.yml`)
    pub workflow_id: String,
}

impl std::fmt::Display for WorkflowTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({})", self.owner, self.repo, self.workflow_id)
    }
}

/// A single dispatch request
///
/// Built once from configuration and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRequest {
    pub target: WorkflowTarget,

    /// Branch or tag the workflow runs on
    pub git_ref: String,

    /// Free-form workflow inputs
    pub inputs: Map<String, Value>,
}

impl TriggerRequest {
    pub fn new(target: WorkflowTarget, git_ref: impl Into<String>, inputs: Map<String, Value>) -> Self {
        Self {
            target,
            git_ref: git_ref.into(),
            inputs,
        }
    }
}
