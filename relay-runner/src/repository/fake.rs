//! Scripted repository for tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relay_client::{ClientError, Result};
use relay_core::domain::run::{RunConclusion, RunRecord};
use relay_core::domain::trigger::TriggerRequest;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use super::WorkflowRepository;

/// Replays queued listing and snapshot responses in order
///
/// An exhausted listing script answers with no runs; an exhausted snapshot
/// script answers with a 503.
#[derive(Default)]
pub struct ScriptedRepository {
    dispatch_error: Mutex<Option<ClientError>>,
    listings: Mutex<VecDeque<Result<Vec<RunRecord>>>>,
    snapshots: Mutex<VecDeque<Result<RunRecord>>>,
    dispatched: Mutex<Vec<TriggerRequest>>,
    page_sizes: Mutex<Vec<u8>>,
    lists: AtomicU32,
    gets: AtomicU32,
}

impl ScriptedRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_dispatch(self, error: ClientError) -> Self {
        *self.dispatch_error.lock().unwrap() = Some(error);
        self
    }

    pub fn listing(self, result: Result<Vec<RunRecord>>) -> Self {
        self.listings.lock().unwrap().push_back(result);
        self
    }

    pub fn empty_listings(self, count: usize) -> Self {
        (0..count).fold(self, |repo, _| repo.listing(Ok(Vec::new())))
    }

    pub fn snapshot(self, result: Result<RunRecord>) -> Self {
        self.snapshots.lock().unwrap().push_back(result);
        self
    }

    pub fn dispatched(&self) -> Vec<TriggerRequest> {
        self.dispatched.lock().unwrap().clone()
    }

    pub fn page_sizes(&self) -> Vec<u8> {
        self.page_sizes.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> u32 {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> u32 {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkflowRepository for ScriptedRepository {
    async fn dispatch(&self, request: &TriggerRequest) -> Result<()> {
        self.dispatched.lock().unwrap().push(request.clone());
        match self.dispatch_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn list_runs(&self, page_size: u8) -> Result<Vec<RunRecord>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.page_sizes.lock().unwrap().push(page_size);
        self.listings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_run(&self, _run_id: u64) -> Result<RunRecord> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.snapshots
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::api_error(503, "script exhausted")))
    }
}

/// Builds a run snapshot
pub fn run(id: u64, created_at: DateTime<Utc>, status: &str, conclusion: Option<&str>) -> RunRecord {
    RunRecord {
        id,
        created_at,
        status: status.into(),
        conclusion: conclusion.map(RunConclusion::from),
        html_url: format!("https://github.com/octo-org/octo-repo/actions/runs/{}", id),
    }
}
