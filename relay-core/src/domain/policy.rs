//! Polling policies
//!
//! Each polling stage gets its own immutable policy. The attempt budget is
//! derived from the timeout and the retry interval, never configured directly.

use std::time::Duration;

/// Timeout and retry interval for one polling stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    /// Total time budget for the stage
    pub timeout: Duration,

    /// Sleep before every check
    pub interval: Duration,
}

impl PollingPolicy {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Creates a policy from the minutes/seconds pair used in configuration
    pub fn from_minutes_and_seconds(timeout_minutes: u64, interval_seconds: u64) -> Self {
        Self::new(
            Duration::from_secs(timeout_minutes.saturating_mul(60)),
            Duration::from_secs(interval_seconds),
        )
    }

    /// Number of checks the stage may perform: `ceil(timeout / interval)`
    ///
    /// A zero interval yields no attempts at all.
    pub fn max_attempts(&self) -> u32 {
        let interval = self.interval.as_millis();
        if interval == 0 {
            return 0;
        }
        u32::try_from(self.timeout.as_millis().div_ceil(interval)).unwrap_or(u32::MAX)
    }

    /// Whole minutes of the timeout, for messages
    pub fn timeout_minutes(&self) -> u64 {
        self.timeout.as_secs() / 60
    }
}

/// Policy for the correlation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationPolicy {
    pub polling: PollingPolicy,

    /// Subtracted from the trigger time to tolerate clock skew and latency
    pub buffer: Duration,

    /// How many recent runs to request per listing
    pub page_size: u8,
}

impl CorrelationPolicy {
    pub fn new(polling: PollingPolicy, buffer: Duration, page_size: u8) -> Self {
        Self {
            polling,
            buffer,
            page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_attempts_defaults() {
        assert_eq!(PollingPolicy::from_minutes_and_seconds(2, 10).max_attempts(), 12);
        assert_eq!(PollingPolicy::from_minutes_and_seconds(10, 10).max_attempts(), 60);
    }

    #[test]
    fn test_max_attempts_rounds_up() {
        assert_eq!(PollingPolicy::from_minutes_and_seconds(1, 7).max_attempts(), 9);
        assert_eq!(PollingPolicy::from_minutes_and_seconds(1, 120).max_attempts(), 1);
        assert_eq!(PollingPolicy::from_minutes_and_seconds(3, 45).max_attempts(), 4);
    }

    #[test]
    fn test_max_attempts_degenerate() {
        assert_eq!(PollingPolicy::from_minutes_and_seconds(0, 10).max_attempts(), 0);
        assert_eq!(PollingPolicy::from_minutes_and_seconds(5, 0).max_attempts(), 0);
    }

    #[test]
    fn test_timeout_minutes() {
        assert_eq!(PollingPolicy::from_minutes_and_seconds(10, 10).timeout_minutes(), 10);
    }
}
