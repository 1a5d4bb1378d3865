//! Workflow endpoints

use crate::GitHubClient;
use crate::error::Result;
use relay_core::domain::run::RunRecord;
use relay_core::domain::trigger::{TriggerRequest, WorkflowTarget};
use relay_core::dto::dispatch::DispatchWorkflow;
use relay_core::dto::run::WorkflowRunList;

impl GitHubClient {
    // =============================================================================
    // Dispatch
    // =============================================================================

    /// Trigger a `workflow_dispatch` event
    ///
    /// The API answers `204 No Content`; no run identifier is returned, so the
    /// created run has to be found afterwards by listing.
    ///
    /// # Arguments
    /// * `request` - Target workflow, ref and inputs
    pub async fn dispatch_workflow(&self, request: &TriggerRequest) -> Result<()> {
        let target = &request.target;
        let url = format!(
            "{}/repos/{}/{}/actions/workflows/{}/dispatches",
            self.base_url, target.owner, target.repo, target.workflow_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&DispatchWorkflow::from(request))
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Runs of a workflow
    // =============================================================================

    /// List the most recent runs of a workflow
    ///
    /// # Arguments
    /// * `target` - The workflow whose runs to list
    /// * `per_page` - How many runs to return (the API caps this at 100)
    ///
    /// # Returns
    /// Runs in API order, most recently created first
    pub async fn list_workflow_runs(
        &self,
        target: &WorkflowTarget,
        per_page: u8,
    ) -> Result<Vec<RunRecord>> {
        let url = format!(
            "{}/repos/{}/{}/actions/workflows/{}/runs",
            self.base_url, target.owner, target.repo, target.workflow_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("per_page", per_page)])
            .send()
            .await?;

        let list: WorkflowRunList = self.handle_response(response).await?;
        tracing::debug!(
            "Listed {} of {} run(s) for {}",
            list.workflow_runs.len(),
            list.total_count,
            target
        );

        Ok(list.workflow_runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use relay_core::domain::run::RunStatus;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn target() -> WorkflowTarget {
        WorkflowTarget {
            owner: "octo-org".to_string(),
            repo: "octo-repo".to_string(),
            workflow_id: "deploy.yml".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_posts_ref_and_inputs() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/octo-org/octo-repo/actions/workflows/deploy.yml/dispatches"))
            .and(header("Authorization", "Bearer ghp_test"))
            .and(header("X-GitHub-Api-Version", "2022-11-28"))
            .and(body_json(json!({ "ref": "main", "inputs": { "version": "1.2.3" } })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(server.uri(), "ghp_test").unwrap();
        let mut inputs = serde_json::Map::new();
        inputs.insert("version".to_string(), json!("1.2.3"));

        client
            .dispatch_workflow(&TriggerRequest::new(target(), "main", inputs))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_surfaces_api_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Unexpected inputs provided: [\"nope\"]",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(server.uri(), "ghp_test").unwrap();
        let err = client
            .dispatch_workflow(&TriggerRequest::new(target(), "main", Default::default()))
            .await
            .unwrap_err();

        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Unexpected inputs provided: [\"nope\"]");
            }
            other => panic!("expected ApiError, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_list_runs_passes_page_size() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo-org/octo-repo/actions/workflows/deploy.yml/runs"))
            .and(query_param("per_page", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 2,
                "workflow_runs": [
                    {
                        "id": 2,
                        "created_at": "2024-05-01T10:00:05Z",
                        "status": "in_progress",
                        "conclusion": null,
                        "html_url": "https://github.com/octo-org/octo-repo/actions/runs/2"
                    },
                    {
                        "id": 1,
                        "created_at": "2024-05-01T09:00:00Z",
                        "status": "completed",
                        "conclusion": "success",
                        "html_url": "https://github.com/octo-org/octo-repo/actions/runs/1"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(server.uri(), "ghp_test").unwrap();
        let runs = client.list_workflow_runs(&target(), 5).await.unwrap();

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].id, 2);
        assert_eq!(runs[0].status, RunStatus::InProgress);
        assert!(runs[1].succeeded());
    }

    #[tokio::test]
    async fn test_list_runs_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(server.uri(), "ghp_test").unwrap();
        let err = client.list_workflow_runs(&target(), 10).await.unwrap_err();
        assert!(err.is_rate_limited(), "got: {err}");
    }

    #[tokio::test]
    async fn test_list_runs_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(server.uri(), "ghp_test").unwrap();
        let err = client.list_workflow_runs(&target(), 10).await.unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)), "got: {err}");
    }
}
