//! Workflow repository
//!
//! Handles communication with the API for the one workflow being relayed:
//! - Dispatching it
//! - Listing its recent runs
//! - Fetching a single run

use async_trait::async_trait;
use relay_client::{GitHubClient, Result};
use relay_core::domain::run::RunRecord;
use relay_core::domain::trigger::{TriggerRequest, WorkflowTarget};

/// Repository trait for workflow operations
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Triggers the workflow. Returns no run identifier.
    async fn dispatch(&self, request: &TriggerRequest) -> Result<()>;

    /// Lists up to `page_size` runs, most recent first
    async fn list_runs(&self, page_size: u8) -> Result<Vec<RunRecord>>;

    /// Fetches the current snapshot of a run
    async fn get_run(&self, run_id: u64) -> Result<RunRecord>;
}

/// HTTP implementation of WorkflowRepository
pub struct HttpWorkflowRepository {
    client: GitHubClient,
    target: WorkflowTarget,
}

impl HttpWorkflowRepository {
    /// Creates a repository bound to `target`
    pub fn new(client: GitHubClient, target: WorkflowTarget) -> Self {
        Self { client, target }
    }
}

#[async_trait]
impl WorkflowRepository for HttpWorkflowRepository {
    async fn dispatch(&self, request: &TriggerRequest) -> Result<()> {
        self.client.dispatch_workflow(request).await
    }

    async fn list_runs(&self, page_size: u8) -> Result<Vec<RunRecord>> {
        self.client.list_workflow_runs(&self.target, page_size).await
    }

    async fn get_run(&self, run_id: u64) -> Result<RunRecord> {
        self.client.get_workflow_run(&self.target, run_id).await
    }
}
