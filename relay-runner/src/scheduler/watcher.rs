//! Completion watcher
//!
//! Fetches the correlated run until it is `completed`. A successful
//! conclusion ends the stage with a match; any other conclusion is a
//! definitive failure and ends it immediately, whatever budget is left.

use relay_core::domain::policy::PollingPolicy;
use relay_core::domain::run::RunRecord;
use tracing::{info, warn};

use super::engine::{self, PollError, PollOutcome};
use crate::error::RunFailure;
use crate::repository::WorkflowRepository;

/// Polls `run_id` until it reaches a terminal state
pub async fn watch<R>(
    repo: &R,
    policy: &PollingPolicy,
    run_id: u64,
) -> PollOutcome<RunRecord, RunFailure>
where
    R: WorkflowRepository + ?Sized,
{
    engine::poll("Completion check", policy, |_| async move {
        let run = match repo.get_run(run_id).await {
            Ok(run) => run,
            Err(e) => return Err(PollError::Transient(e)),
        };

        info!(
            "Current status: {}, conclusion: {}",
            run.status,
            run.conclusion
                .as_ref()
                .map(|c| c.as_str())
                .unwrap_or("null")
        );

        if !run.is_completed() {
            info!("Workflow still running (status: {})...", run.status);
            return Ok(None);
        }

        if run.succeeded() {
            info!("Workflow completed successfully!");
            return Ok(Some(run));
        }

        let failure = RunFailure::from_run(run);
        warn!(
            "Workflow completed but failed with conclusion: {}",
            failure.conclusion
        );
        warn!("Workflow URL: {}", failure.run.html_url);
        Err(PollError::Definitive(failure))
    })
    .await
}
