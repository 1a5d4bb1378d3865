//! Workflow run DTOs

use serde::{Deserialize, Serialize};

use crate::domain::run::RunRecord;

/// Response of the "list workflow runs" endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRunList {
    pub total_count: u64,
    pub workflow_runs: Vec<RunRecord>,
}

/// Error body returned by the API alongside non-success statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}
