//! Relay HTTP Client
//!
//! A small, type-safe client for the parts of the GitHub Actions REST API that
//! relay needs: dispatching a workflow, listing a workflow's recent runs and
//! fetching a single run.
//!
//! # Example
//!
//! ```no_run
//! use relay_client::GitHubClient;
//! use relay_core::domain::trigger::{TriggerRequest, WorkflowTarget};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GitHubClient::new("ghp_example")?;
//!     let target = WorkflowTarget {
//!         owner: "octo-org".to_string(),
//!         repo: "octo-repo".to_string(),
//!         workflow_id: "deploy.yml".to_string(),
//!     };
//!
//!     client
//!         .dispatch_workflow(&TriggerRequest::new(target.clone(), "main", Default::default()))
//!         .await?;
//!
//!     let runs = client.list_workflow_runs(&target, 10).await?;
//!     println!("Latest run: {:?}", runs.first().map(|r| r.id));
//!     Ok(())
//! }
//! ```

pub mod error;
mod runs;
mod workflows;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use relay_core::domain::run::RunRecord;

use relay_core::dto::run::ApiErrorBody;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// REST API version pinned in every request
pub const API_VERSION: &str = "2022-11-28";

const USER_AGENT: &str = concat!("relay/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the GitHub Actions API
///
/// Endpoints are grouped by resource:
/// - Workflows: dispatch, list runs
/// - Runs: fetch a single run
#[derive(Clone)]
pub struct GitHubClient {
    /// Base URL of the API (e.g., "https://api.github.com")
    base_url: String,
    /// Token sent as a bearer credential
    token: String,
    /// HTTP client instance
    client: Client,
}

impl GitHubClient {
    /// Create a client for the public API
    ///
    /// # Arguments
    /// * `token` - A token allowed to dispatch and read workflow runs
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    /// Create a client for another API endpoint (GitHub Enterprise Server,
    /// or a local mock)
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers())
            .build()?;

        Ok(Self::with_client(base_url, token, client))
    }

    /// Create a client around a pre-configured reqwest Client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    /// The caller is responsible for setting a `User-Agent`; the API rejects
    /// requests without one.
    pub fn with_client(base_url: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., 204 on dispatch)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        // The API usually answers with {"message": ..., "documentation_url": ...}
        let message = serde_json::from_str::<ApiErrorBody>(&error_text)
            .map(|body| body.message)
            .unwrap_or(error_text);

        Err(ClientError::api_error(status.as_u16(), message))
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_static(API_VERSION),
    );
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GitHubClient::new("token").unwrap();
        assert_eq!(client.base_url(), "https://api.github.com");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = GitHubClient::with_base_url("https://ghe.example.com/api/v3/", "token").unwrap();
        assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = GitHubClient::new("ghp_secret").unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
