//! Relay configuration
//!
//! Turns the raw command line / action inputs into a validated configuration:
//! the trigger request, the API connection and the two polling policies.
//!
//! Empty input values count as unset, the same way GitHub Actions treats
//! optional inputs nobody supplied.

use relay_core::domain::policy::{CorrelationPolicy, PollingPolicy};
use relay_core::domain::trigger::{TriggerRequest, WorkflowTarget};
use serde_json::Value;
use std::time::Duration;

use crate::Cli;
use crate::error::RelayError;

pub const DEFAULT_WORKFLOW_REF: &str = "main";
pub const DEFAULT_VERIFICATION_TIMEOUT_MINUTES: u64 = 2;
pub const DEFAULT_VERIFICATION_RETRY_INTERVAL_SECONDS: u64 = 10;
pub const DEFAULT_VERIFICATION_BUFFER_SECONDS: u64 = 30;
pub const DEFAULT_COMPLETION_TIMEOUT_MINUTES: u64 = 10;
pub const DEFAULT_COMPLETION_RETRY_INTERVAL_SECONDS: u64 = 10;
pub const DEFAULT_RUNS_PER_PAGE: u64 = 10;

/// Largest page the run listing endpoint accepts
const MAX_RUNS_PER_PAGE: u8 = 100;

/// Upper bound on the correlation buffer
const MAX_BUFFER: Duration = Duration::from_secs(24 * 60 * 60);

type Result<T> = std::result::Result<T, RelayError>;

/// Relay configuration
#[derive(Clone)]
pub struct Config {
    /// Token used for every API call
    pub token: String,

    /// API base URL (e.g., "https://api.github.com")
    pub api_url: String,

    /// What to dispatch
    pub request: TriggerRequest,

    /// How to find the dispatched run
    pub correlation: CorrelationPolicy,

    /// How to wait for it to finish
    pub completion: PollingPolicy,
}

impl Config {
    /// Builds and validates the configuration from parsed arguments
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let token = required(&cli.github_token, "github-token")?;
        let owner = required(&cli.target_owner, "target-owner")?;
        let repo = required(&cli.target_repo, "target-repo")?;
        let workflow_id = required(&cli.workflow_id, "workflow-id")?;
        let git_ref = optional(&cli.workflow_ref).unwrap_or(DEFAULT_WORKFLOW_REF);
        let inputs = parse_inputs(optional(&cli.workflow_inputs).unwrap_or("{}"))?;

        let correlation = CorrelationPolicy::new(
            PollingPolicy::from_minutes_and_seconds(
                number(
                    &cli.workflow_verification_timeout_minutes,
                    "workflow-verification-timeout-minutes",
                    DEFAULT_VERIFICATION_TIMEOUT_MINUTES,
                )?,
                number(
                    &cli.workflow_verification_retry_interval_seconds,
                    "workflow-verification-retry-interval-seconds",
                    DEFAULT_VERIFICATION_RETRY_INTERVAL_SECONDS,
                )?,
            ),
            Duration::from_secs(number(
                &cli.workflow_verification_buffer_seconds,
                "workflow-verification-buffer-seconds",
                DEFAULT_VERIFICATION_BUFFER_SECONDS,
            )?),
            page_size(number(
                &cli.workflow_runs_per_page,
                "workflow-runs-per-page",
                DEFAULT_RUNS_PER_PAGE,
            )?)?,
        );

        let completion = PollingPolicy::from_minutes_and_seconds(
            number(
                &cli.workflow_completion_timeout_minutes,
                "workflow-completion-timeout-minutes",
                DEFAULT_COMPLETION_TIMEOUT_MINUTES,
            )?,
            number(
                &cli.workflow_completion_retry_interval_seconds,
                "workflow-completion-retry-interval-seconds",
                DEFAULT_COMPLETION_RETRY_INTERVAL_SECONDS,
            )?,
        );

        let config = Self {
            token,
            api_url: cli.api_url.trim().to_string(),
            request: TriggerRequest::new(
                WorkflowTarget {
                    owner,
                    repo,
                    workflow_id,
                },
                git_ref,
                inputs,
            ),
            correlation,
            completion,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(invalid("api-url must start with http:// or https://"));
        }

        let target = &self.request.target;
        for (name, value) in [
            ("target-owner", &target.owner),
            ("target-repo", &target.repo),
            ("workflow-id", &target.workflow_id),
        ] {
            if value.contains('/') {
                return Err(invalid(format!("{} must not contain '/': {}", name, value)));
            }
        }

        if self.correlation.polling.timeout.is_zero() {
            return Err(invalid("workflow-verification-timeout-minutes must be greater than 0"));
        }

        if self.correlation.polling.interval.is_zero() {
            return Err(invalid(
                "workflow-verification-retry-interval-seconds must be greater than 0",
            ));
        }

        if self.correlation.buffer > MAX_BUFFER {
            return Err(invalid(format!(
                "workflow-verification-buffer-seconds must be at most {}",
                MAX_BUFFER.as_secs()
            )));
        }

        if self.completion.timeout.is_zero() {
            return Err(invalid("workflow-completion-timeout-minutes must be greater than 0"));
        }

        if self.completion.interval.is_zero() {
            return Err(invalid(
                "workflow-completion-retry-interval-seconds must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("request", &self.request)
            .field("correlation", &self.correlation)
            .field("completion", &self.completion)
            .finish()
    }
}

/// Parses `workflow-inputs`, which must be a JSON object
pub fn parse_inputs(raw: &str) -> Result<serde_json::Map<String, Value>> {
    match serde_json::from_str(raw).map_err(RelayError::InvalidInputs)? {
        Value::Object(map) => Ok(map),
        other => Err(invalid(format!(
            "workflow-inputs must be a JSON object, got: {}",
            other
        ))),
    }
}

fn optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    optional(value)
        .map(str::to_string)
        .ok_or_else(|| invalid(format!("Input required and not supplied: {}", name)))
}

fn number(value: &Option<String>, name: &str, default: u64) -> Result<u64> {
    match optional(value) {
        None => Ok(default),
        Some(raw) => raw.parse::<u64>().map_err(|_| {
            invalid(format!(
                "{} must be a non-negative whole number, got '{}'",
                name, raw
            ))
        }),
    }
}

fn page_size(value: u64) -> Result<u8> {
    match u8::try_from(value) {
        Ok(size) if (1..=MAX_RUNS_PER_PAGE).contains(&size) => Ok(size),
        _ => Err(invalid(format!(
            "workflow-runs-per-page must be between 1 and {}, got {}",
            MAX_RUNS_PER_PAGE, value
        ))),
    }
}

fn invalid(message: impl Into<String>) -> RelayError {
    RelayError::Config(message.into())
}
