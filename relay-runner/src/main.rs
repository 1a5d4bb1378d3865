//! Relay
//!
//! Dispatches a GitHub Actions workflow in another repository and waits for
//! the run it created to finish.
//!
//! Architecture:
//! - Configuration: command line flags, each also read from the matching
//!   `INPUT_*` variable when relay runs as an action step
//! - Repository: the three API calls relay makes, behind a trait
//! - Scheduler: bounded polling for correlation and completion
//! - Services: the relay state machine and output publishing
//!
//! The process exits non-zero on any terminal failure after logging why.

mod config;
mod error;
mod repository;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use relay_client::{DEFAULT_API_URL, GitHubClient};
use relay_core::domain::run::RunRecord;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repository::HttpWorkflowRepository;
use crate::service::output::{self, OutputSink};
use crate::service::Relay;

#[derive(Parser)]
#[command(name = "relay")]
#[command(
    about = "Dispatch a GitHub Actions workflow and wait for its run to finish",
    long_about = None
)]
pub struct Cli {
    /// Token allowed to dispatch and read workflow runs in the target repository
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Owner of the target repository
    #[arg(long, env = "INPUT_TARGET-OWNER")]
    pub target_owner: Option<String>,

    /// Name of the target repository
    #[arg(long, env = "INPUT_TARGET-REPO")]
    pub target_repo: Option<String>,

    /// Workflow file name or numeric id
    #[arg(long, env = "INPUT_WORKFLOW-ID")]
    pub workflow_id: Option<String>,

    /// Branch or tag to run the workflow on [default: main]
    #[arg(long, env = "INPUT_WORKFLOW-REF")]
    pub workflow_ref: Option<String>,

    /// Workflow inputs as a JSON object [default: {}]
    #[arg(long, env = "INPUT_WORKFLOW-INPUTS")]
    pub workflow_inputs: Option<String>,

    /// How long to look for the dispatched run [default: 2]
    #[arg(long, env = "INPUT_WORKFLOW-VERIFICATION-TIMEOUT-MINUTES")]
    pub workflow_verification_timeout_minutes: Option<String>,

    /// Pause before each look for the dispatched run [default: 10]
    #[arg(long, env = "INPUT_WORKFLOW-VERIFICATION-RETRY-INTERVAL-SECONDS")]
    pub workflow_verification_retry_interval_seconds: Option<String>,

    /// Tolerated skew between the trigger time and the run's creation time [default: 30]
    #[arg(long, env = "INPUT_WORKFLOW-VERIFICATION-BUFFER-SECONDS")]
    pub workflow_verification_buffer_seconds: Option<String>,

    /// How long to wait for the run to complete [default: 10]
    #[arg(long, env = "INPUT_WORKFLOW-COMPLETION-TIMEOUT-MINUTES")]
    pub workflow_completion_timeout_minutes: Option<String>,

    /// Pause before each completion check [default: 10]
    #[arg(long, env = "INPUT_WORKFLOW-COMPLETION-RETRY-INTERVAL-SECONDS")]
    pub workflow_completion_retry_interval_seconds: Option<String>,

    /// How many recent runs to list per look [default: 10]
    #[arg(long, env = "INPUT_WORKFLOW-RUNS-PER-PAGE")]
    pub workflow_runs_per_page: Option<String>,

    /// API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_runner=info,relay_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(&cli, output::sink_from_env()).await {
        Ok(run) => {
            info!("Workflow run {} completed successfully: {}", run.id, run.html_url);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let message = format!("{:#}", e);
            error!("Failed to trigger and monitor workflow: {}", message);
            if output::running_in_actions() {
                println!("{}", output::format_error_annotation(&message));
            }
            ExitCode::FAILURE
        }
    }
}

/// Loads configuration, wires the HTTP repository and runs one relay
async fn run(cli: &Cli, outputs: Arc<dyn OutputSink>) -> Result<RunRecord> {
    let config = Config::from_cli(cli)?;
    info!(
        "Loaded configuration: target={}, ref={}, api_url={}",
        config.request.target, config.request.git_ref, config.api_url
    );

    let client = GitHubClient::with_base_url(&config.api_url, &config.token)
        .context("Failed to initialize GitHub client")?;
    let repo = Arc::new(HttpWorkflowRepository::new(
        client,
        config.request.target.clone(),
    ));

    let relay = Relay::new(repo, outputs, config.correlation, config.completion);
    let run = relay.run(&config.request).await?;

    Ok(run)
}
