//! Workflow run domain model
//!
//! A `RunRecord` is a read-only snapshot of one remote workflow run. The
//! remote system owns the run; relay only ever observes successive snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One remote workflow execution as reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Numeric run identifier
    pub id: u64,

    /// When the remote system created the run
    pub created_at: DateTime<Utc>,

    /// Current lifecycle status
    pub status: RunStatus,

    /// Final classification, only populated once the run is completed
    #[serde(default)]
    pub conclusion: Option<RunConclusion>,

    /// Location of the run for human inspection
    pub html_url: String,
}

impl RunRecord {
    /// Whether the run has reached its terminal state
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// The run's conclusion, if and only if it has completed
    ///
    /// Conclusions reported while the run is still queued or running are
    /// ignored.
    pub fn final_conclusion(&self) -> Option<&RunConclusion> {
        if self.is_completed() {
            self.conclusion.as_ref()
        } else {
            None
        }
    }

    /// Whether the run completed with a `success` conclusion
    pub fn succeeded(&self) -> bool {
        matches!(self.final_conclusion(), Some(RunConclusion::Success))
    }
}

/// Lifecycle status of a run
///
/// Statuses relay does not reason about (`waiting`, `requested`, `pending`,
/// ...) are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    Other(String),
}

impl RunStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::Completed => "completed",
            RunStatus::Other(other) => other,
        }
    }

    /// Statuses a freshly dispatched run can plausibly be in
    pub fn is_correlatable(&self) -> bool {
        matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Completed
        )
    }
}

impl From<String> for RunStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => RunStatus::Queued,
            "in_progress" => RunStatus::InProgress,
            "completed" => RunStatus::Completed,
            _ => RunStatus::Other(value),
        }
    }
}

impl From<&str> for RunStatus {
    fn from(value: &str) -> Self {
        RunStatus::from(value.to_string())
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final classification of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunConclusion {
    Success,
    Failure,
    Cancelled,
    Other(String),
}

impl RunConclusion {
    pub fn as_str(&self) -> &str {
        match self {
            RunConclusion::Success => "success",
            RunConclusion::Failure => "failure",
            RunConclusion::Cancelled => "cancelled",
            RunConclusion::Other(other) => other,
        }
    }
}

impl From<String> for RunConclusion {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => RunConclusion::Success,
            "failure" => RunConclusion::Failure,
            "cancelled" => RunConclusion::Cancelled,
            _ => RunConclusion::Other(value),
        }
    }
}

impl From<&str> for RunConclusion {
    fn from(value: &str) -> Self {
        RunConclusion::from(value.to_string())
    }
}

impl From<RunConclusion> for String {
    fn from(conclusion: RunConclusion) -> Self {
        conclusion.as_str().to_string()
    }
}

impl std::fmt::Display for RunConclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(status: &str, conclusion: Option<&str>) -> RunRecord {
        RunRecord {
            id: 1,
            created_at: Utc::now(),
            status: status.into(),
            conclusion: conclusion.map(RunConclusion::from),
            html_url: "https://github.com/o/r/actions/runs/1".to_string(),
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(RunStatus::from("queued"), RunStatus::Queued);
        assert_eq!(RunStatus::from("in_progress"), RunStatus::InProgress);
        assert_eq!(RunStatus::from("completed"), RunStatus::Completed);
        assert_eq!(
            RunStatus::from("waiting"),
            RunStatus::Other("waiting".to_string())
        );
        assert_eq!(RunStatus::from("waiting").as_str(), "waiting");
    }

    #[test]
    fn test_correlatable_statuses() {
        assert!(RunStatus::Queued.is_correlatable());
        assert!(RunStatus::InProgress.is_correlatable());
        assert!(RunStatus::Completed.is_correlatable());
        assert!(!RunStatus::from("requested").is_correlatable());
    }

    #[test]
    fn test_conclusion_ignored_until_completed() {
        let running = record("in_progress", Some("failure"));
        assert_eq!(running.final_conclusion(), None);
        assert!(!running.succeeded());

        let done = record("completed", Some("success"));
        assert_eq!(done.final_conclusion(), Some(&RunConclusion::Success));
        assert!(done.succeeded());

        let failed = record("completed", Some("timed_out"));
        assert_eq!(
            failed.final_conclusion(),
            Some(&RunConclusion::Other("timed_out".to_string()))
        );
        assert!(!failed.succeeded());
    }

    #[test]
    fn test_deserialize_api_payload() {
        let run: RunRecord = serde_json::from_value(json!({
            "id": 30433642,
            "name": "Build",
            "created_at": "2020-01-22T19:33:08Z",
            "status": "queued",
            "conclusion": null,
            "html_url": "https://github.com/octo-org/octo-repo/actions/runs/30433642",
            "run_number": 562
        }))
        .unwrap();

        assert_eq!(run.id, 30433642);
        assert_eq!(run.status, RunStatus::Queued);
        assert_eq!(run.conclusion, None);
        assert_eq!(run.created_at.to_rfc3339(), "2020-01-22T19:33:08+00:00");
    }

    #[test]
    fn test_unknown_values_round_trip_verbatim() {
        let run = record("pending", Some("action_required"));
        let value = serde_json::to_value(&run).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["conclusion"], "action_required");
    }
}
