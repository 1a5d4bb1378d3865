//! Run correlator
//!
//! The dispatch call returns no run id, so the run it created has to be
//! recognised in the workflow's run listing. A run qualifies when it was
//! created no earlier than the trigger time minus the buffer and its status
//! is one a fresh run can have. The first qualifying run in listing order is
//! taken; the API lists most recent first.

use chrono::{DateTime, TimeDelta, Utc};
use relay_core::domain::policy::CorrelationPolicy;
use relay_core::domain::run::RunRecord;
use std::convert::Infallible;
use tracing::{debug, info};

use super::engine::{self, PollError, PollOutcome};
use crate::repository::WorkflowRepository;

/// Earliest creation time a correlated run may have
pub fn correlation_floor(triggered_at: DateTime<Utc>, buffer: std::time::Duration) -> DateTime<Utc> {
    let buffer = TimeDelta::from_std(buffer).unwrap_or(TimeDelta::zero());
    triggered_at
        .checked_sub_signed(buffer)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Whether `run` could have been created by a dispatch made at or after `floor`
pub fn is_candidate(run: &RunRecord, floor: DateTime<Utc>) -> bool {
    run.created_at >= floor && run.status.is_correlatable()
}

/// Picks the first candidate in listing order
pub fn select_run(runs: &[RunRecord], floor: DateTime<Utc>) -> Option<&RunRecord> {
    runs.iter().find(|run| is_candidate(run, floor))
}

/// Polls the run listing until the dispatched run shows up
///
/// Listing errors are transient. Correlation has no definitive failure: it
/// either matches or times out.
pub async fn correlate<R>(
    repo: &R,
    policy: &CorrelationPolicy,
    triggered_at: DateTime<Utc>,
) -> PollOutcome<RunRecord, Infallible>
where
    R: WorkflowRepository + ?Sized,
{
    let floor = correlation_floor(triggered_at, policy.buffer);
    let page_size = policy.page_size;

    engine::poll("Verification", &policy.polling, |_| async move {
        let runs = match repo.list_runs(page_size).await {
            Ok(runs) => runs,
            Err(e) => return Err(PollError::Transient(e)),
        };

        info!("Found {} total workflow runs", runs.len());
        debug!(
            "Trigger time: {}, buffer time ({}s before trigger): {}",
            triggered_at.to_rfc3339(),
            policy.buffer.as_secs(),
            floor.to_rfc3339()
        );

        for (index, run) in runs.iter().enumerate() {
            debug!(
                "Run {}: ID={}, Status={}, Created={}, After buffer={}, Relevant status={}",
                index + 1,
                run.id,
                run.status,
                run.created_at.to_rfc3339(),
                run.created_at >= floor,
                run.status.is_correlatable()
            );
        }

        match select_run(&runs, floor) {
            Some(run) => {
                info!("Workflow run found!");
                info!("  Run ID: {}", run.id);
                info!("  Status: {}", run.status);
                info!("  Created: {}", run.created_at.to_rfc3339());
                info!("  URL: {}", run.html_url);
                Ok(Some(run.clone()))
            }
            None => {
                info!("No new relevant workflow runs found yet...");
                Ok(None)
            }
        }
    })
    .await
}
