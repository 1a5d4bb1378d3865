//! Terminal error kinds
//!
//! Every way a relay invocation can end unsuccessfully. Transient query
//! errors are deliberately absent: they never leave the polling loop.

use relay_client::ClientError;
use relay_core::domain::run::{RunConclusion, RunRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Required configuration missing or out of range
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// `workflow-inputs` is not valid JSON
    #[error("Invalid workflow-inputs JSON: {0}")]
    InvalidInputs(serde_json::Error),

    /// The dispatch call itself failed
    #[error("Failed to dispatch workflow: {0}")]
    Dispatch(ClientError),

    /// No run matching the dispatch appeared in time
    #[error("Failed to find triggered workflow within {minutes} minutes")]
    CorrelationTimeout { minutes: u64 },

    /// The run did not reach a terminal state in time
    #[error("Workflow completion timed out after {minutes} minutes (check manually: {url})")]
    CompletionTimeout { minutes: u64, url: String },

    /// The run completed with a non-success conclusion
    #[error("Workflow failed with conclusion: {}", .0.conclusion)]
    RunFailed(RunFailure),

    /// Writing a named output failed
    #[error("Failed to write output {name}: {error}")]
    Output {
        name: &'static str,
        error: std::io::Error,
    },
}

/// A run that reached `completed` with anything but `success`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub conclusion: RunConclusion,
    pub run: RunRecord,
}

impl RunFailure {
    /// Builds a failure from a completed run, using `unknown` when the API
    /// omitted the conclusion
    pub fn from_run(run: RunRecord) -> Self {
        let conclusion = run
            .final_conclusion()
            .cloned()
            .unwrap_or_else(|| RunConclusion::Other("unknown".to_string()));
        Self { conclusion, run }
    }
}
