//! Poll loop engine
//!
//! Runs a check up to `policy.max_attempts()` times, sleeping one interval
//! before every check. A check either finds what it is looking for, finds
//! nothing yet, hits a transient error (logged and retried) or reports a
//! definitive failure (returned at once).

use relay_client::ClientError;
use relay_core::domain::policy::PollingPolicy;
use std::future::Future;
use tokio::time;
use tracing::{info, warn};

/// Terminal result of a polling stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T, F> {
    /// The check found its value
    Matched(T),

    /// The attempt budget ran out
    TimedOut { attempts: u32 },

    /// The check reported a non-retryable failure
    Failed(F),
}

/// Why a single check did not produce a value
#[derive(Debug)]
pub enum PollError<F> {
    /// Observing the remote system failed; try again next attempt
    Transient(ClientError),

    /// The remote system confirmed a negative outcome; stop polling
    Definitive(F),
}

/// Position of a check within its stage's budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub number: u32,
    pub max: u32,
}

impl std::fmt::Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.number, self.max)
    }
}

/// Polls `check` under `policy` until it matches, fails definitively or the
/// budget is exhausted
///
/// `stage` only labels log lines.
pub async fn poll<T, F, C, Fut>(stage: &str, policy: &PollingPolicy, mut check: C) -> PollOutcome<T, F>
where
    C: FnMut(Attempt) -> Fut,
    Fut: Future<Output = Result<Option<T>, PollError<F>>>,
{
    let max = policy.max_attempts();

    info!(
        "{} timeout configured for {} minutes (max {} attempts, {}s intervals)",
        stage,
        policy.timeout_minutes(),
        max,
        policy.interval.as_secs()
    );

    for number in 1..=max {
        let attempt = Attempt { number, max };
        info!("{} attempt {}", stage, attempt);

        time::sleep(policy.interval).await;

        match check(attempt).await {
            Ok(Some(value)) => return PollOutcome::Matched(value),
            Ok(None) => {}
            Err(PollError::Definitive(failure)) => return PollOutcome::Failed(failure),
            Err(PollError::Transient(e)) => {
                if e.is_rate_limited() {
                    warn!("{} check hit an API rate limit, will retry: {}", stage, e);
                } else {
                    warn!("{} check failed, will retry: {}", stage, e);
                }
            }
        }
    }

    PollOutcome::TimedOut { attempts: max }
}
