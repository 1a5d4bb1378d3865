//! Output service
//!
//! Publishes named results to whatever invoked relay. Inside GitHub Actions
//! that is the file named by `GITHUB_OUTPUT`; anywhere else outputs are
//! printed as `name=value` lines on stdout.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Outputs relay can set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputName {
    RunId,
    RunUrl,
    RunStatus,
    RunConclusion,
    FinalStatus,
}

impl OutputName {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputName::RunId => "workflow-run-id",
            OutputName::RunUrl => "workflow-run-url",
            OutputName::RunStatus => "workflow-run-status",
            OutputName::RunConclusion => "workflow-run-conclusion",
            OutputName::FinalStatus => "workflow-final-status",
        }
    }
}

impl std::fmt::Display for OutputName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service trait for publishing named outputs
pub trait OutputSink: Send + Sync {
    /// Sets `name` to `value`
    fn set_output(&self, name: OutputName, value: &str) -> io::Result<()>;
}

/// Appends outputs to a GitHub Actions output file
pub struct GithubOutputFile {
    path: PathBuf,
}

impl GithubOutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for GithubOutputFile {
    fn set_output(&self, name: OutputName, value: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.write_all(format_output_entry(name, value).as_bytes())
    }
}

/// Prints outputs to stdout
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn set_output(&self, name: OutputName, value: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(format_output_entry(name, value).as_bytes())?;
        stdout.flush()
    }
}

/// Picks the output file from `GITHUB_OUTPUT`, falling back to stdout
pub fn sink_from_env() -> Arc<dyn OutputSink> {
    match std::env::var("GITHUB_OUTPUT") {
        Ok(path) if !path.is_empty() => Arc::new(GithubOutputFile::new(path)),
        _ => Arc::new(StdoutSink),
    }
}

/// Formats one output entry
///
/// Single-line values use `name=value`. Values with line breaks use the
/// heredoc form `name<<DELIM` with a random delimiter.
pub fn format_output_entry(name: OutputName, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{}={}\n", name, value);
    }

    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}

/// Formats a failure as a workflow `::error::` command
pub fn format_error_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{}", escaped)
}

/// Whether relay runs inside a GitHub Actions job
pub fn running_in_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}
