//! Dispatch DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::trigger::TriggerRequest;

/// Body of a `workflow_dispatch` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchWorkflow {
    #[serde(rename = "ref")]
    pub git_ref: String,

    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub inputs: Map<String, Value>,
}

impl From<&TriggerRequest> for DispatchWorkflow {
    fn from(request: &TriggerRequest) -> Self {
        Self {
            git_ref: request.git_ref.clone(),
            inputs: request.inputs.clone(),
        }
    }
}
