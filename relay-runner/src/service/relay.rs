//! Relay service
//!
//! Drives one relay through its phases:
//!
//! ```text
//! Dispatching -> Correlating -> Watching -> Succeeded
//!      |              |             |
//!      v              v             v
//!    Failed        TimedOut    Failed / TimedOut
//! ```
//!
//! `Phase::advance` is a pure transition function over events. `Relay`
//! performs the side effect each phase calls for and feeds the resulting
//! event back, publishing outputs on the way.

use chrono::{DateTime, Utc};
use relay_client::ClientError;
use relay_core::domain::policy::{CorrelationPolicy, PollingPolicy};
use relay_core::domain::run::RunRecord;
use relay_core::domain::trigger::TriggerRequest;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{RelayError, RunFailure};
use crate::repository::WorkflowRepository;
use crate::scheduler::{self, PollOutcome};
use crate::service::output::{OutputName, OutputSink};

/// Where a relay currently is
#[derive(Debug)]
pub enum Phase {
    Dispatching,
    Correlating { triggered_at: DateTime<Utc> },
    Watching { run: RunRecord },
    Succeeded { run: RunRecord },
    Failed(RelayError),
    TimedOut(Stage),
}

/// The polling stage that ran out of budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Correlation,
    Completion { run: RunRecord },
}

/// Result of the side effect performed for a phase
#[derive(Debug)]
pub enum Event {
    Dispatched { at: DateTime<Utc> },
    DispatchFailed(ClientError),
    Correlated(PollOutcome<RunRecord, Infallible>),
    Watched(PollOutcome<RunRecord, RunFailure>),
}

impl Phase {
    /// Applies `event` to the phase
    ///
    /// Events that do not belong to the current phase leave it unchanged;
    /// terminal phases absorb every event.
    pub fn advance(self, event: Event) -> Phase {
        match (self, event) {
            (Phase::Dispatching, Event::Dispatched { at }) => {
                Phase::Correlating { triggered_at: at }
            }
            (Phase::Dispatching, Event::DispatchFailed(e)) => Phase::Failed(RelayError::Dispatch(e)),

            (Phase::Correlating { .. }, Event::Correlated(outcome)) => match outcome {
                PollOutcome::Matched(run) => Phase::Watching { run },
                PollOutcome::TimedOut { .. } => Phase::TimedOut(Stage::Correlation),
                PollOutcome::Failed(never) => match never {},
            },

            (Phase::Watching { run }, Event::Watched(outcome)) => match outcome {
                PollOutcome::Matched(done) => Phase::Succeeded { run: done },
                PollOutcome::TimedOut { .. } => Phase::TimedOut(Stage::Completion { run }),
                PollOutcome::Failed(failure) => Phase::Failed(RelayError::RunFailed(failure)),
            },

            (phase, _) => phase,
        }
    }
}

/// Dispatches a workflow and follows the created run to completion
pub struct Relay {
    repo: Arc<dyn WorkflowRepository>,
    outputs: Arc<dyn OutputSink>,
    correlation: CorrelationPolicy,
    completion: PollingPolicy,
}

impl Relay {
    pub fn new(
        repo: Arc<dyn WorkflowRepository>,
        outputs: Arc<dyn OutputSink>,
        correlation: CorrelationPolicy,
        completion: PollingPolicy,
    ) -> Self {
        Self {
            repo,
            outputs,
            correlation,
            completion,
        }
    }

    /// Runs every phase until a terminal one is reached
    ///
    /// # Returns
    /// The final snapshot of the successfully completed run
    pub async fn run(&self, request: &TriggerRequest) -> Result<RunRecord, RelayError> {
        let mut phase = Phase::Dispatching;

        loop {
            let event = match phase {
                Phase::Dispatching => self.dispatch(request).await,
                Phase::Correlating { triggered_at } => {
                    info!("Waiting for workflow to be created...");
                    let outcome =
                        scheduler::correlate(self.repo.as_ref(), &self.correlation, triggered_at)
                            .await;
                    Event::Correlated(outcome)
                }
                Phase::Watching { ref run } => {
                    info!("Waiting for workflow to complete...");
                    let outcome =
                        scheduler::watch(self.repo.as_ref(), &self.completion, run.id).await;
                    Event::Watched(outcome)
                }
                Phase::Succeeded { run } => return Ok(run),
                Phase::Failed(e) => return Err(e),
                Phase::TimedOut(stage) => return Err(self.timed_out(stage)),
            };

            self.publish(&event)?;
            phase = phase.advance(event);
        }
    }

    async fn dispatch(&self, request: &TriggerRequest) -> Event {
        // Sole time anchor for correlation, taken before the request goes out
        let at = Utc::now();
        info!("Triggering workflow at: {}", at.to_rfc3339());

        match self.repo.dispatch(request).await {
            Ok(()) => {
                info!("Successfully triggered workflow");
                info!("Target: {}/{}", request.target.owner, request.target.repo);
                info!("Workflow: {}", request.target.workflow_id);
                info!("Ref: {}", request.git_ref);
                info!("Inputs: {}", serde_json::Value::Object(request.inputs.clone()));
                Event::Dispatched { at }
            }
            Err(e) => Event::DispatchFailed(e),
        }
    }

    /// Sets the outputs an event makes available
    fn publish(&self, event: &Event) -> Result<(), RelayError> {
        match event {
            Event::Correlated(PollOutcome::Matched(run)) => {
                self.set(OutputName::RunId, &run.id.to_string())?;
                self.set(OutputName::RunUrl, &run.html_url)?;
                self.set(OutputName::RunStatus, run.status.as_str())
            }
            Event::Watched(PollOutcome::Matched(run)) => {
                self.set(OutputName::RunConclusion, "success")?;
                self.set(OutputName::FinalStatus, run.status.as_str())
            }
            Event::Watched(PollOutcome::Failed(failure)) => {
                self.set(OutputName::RunConclusion, failure.conclusion.as_str())?;
                self.set(OutputName::FinalStatus, failure.run.status.as_str())
            }
            _ => Ok(()),
        }
    }

    fn set(&self, name: OutputName, value: &str) -> Result<(), RelayError> {
        self.outputs
            .set_output(name, value)
            .map_err(|error| RelayError::Output {
                name: name.as_str(),
                error,
            })
    }

    fn timed_out(&self, stage: Stage) -> RelayError {
        match stage {
            Stage::Correlation => {
                warn!("Could not find the triggered workflow within the timeout period");
                warn!("The workflow may not have been created or there may be a delay");
                RelayError::CorrelationTimeout {
                    minutes: self.correlation.polling.timeout_minutes(),
                }
            }
            Stage::Completion { run } => {
                warn!("Workflow completion check timed out");
                warn!("The workflow may still be running. Check manually: {}", run.html_url);
                RelayError::CompletionTimeout {
                    minutes: self.completion.timeout_minutes(),
                    url: run.html_url,
                }
            }
        }
    }
}
