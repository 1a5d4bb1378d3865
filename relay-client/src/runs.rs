//! Single-run endpoints

use crate::GitHubClient;
use crate::error::Result;
use relay_core::domain::run::RunRecord;
use relay_core::domain::trigger::WorkflowTarget;

impl GitHubClient {
    /// Get the current snapshot of a workflow run
    ///
    /// # Arguments
    /// * `target` - Supplies the owner and repository of the run
    /// * `run_id` - The run identifier
    pub async fn get_workflow_run(&self, target: &WorkflowTarget, run_id: u64) -> Result<RunRecord> {
        let url = format!(
            "{}/repos/{}/{}/actions/runs/{}",
            self.base_url, target.owner, target.repo, run_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
