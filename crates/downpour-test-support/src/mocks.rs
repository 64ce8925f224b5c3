//! Scriptable fake backend used by unit and integration suites.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::bail;
use async_trait::async_trait;
use downpour_core::{
    DownloadBackend, DownloadReceipt, DownloadRequest, DownloadTask, PlatformInfo, SearchPage,
    SearchRequest,
};
use downpour_events::TaskStatus;
use uuid::Uuid;

/// In-memory [`DownloadBackend`] with scripted responses, per-operation
/// failure injection, optional latency, and call recording.
///
/// Canned responses are consumed in FIFO order; the last task snapshot is
/// sticky so repeated polls keep observing it.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    calls: Vec<String>,
    pages: VecDeque<SearchPage>,
    receipts: VecDeque<DownloadReceipt>,
    snapshots: VecDeque<Vec<DownloadTask>>,
    platforms: Vec<PlatformInfo>,
    suggestions: VecDeque<Vec<String>>,
    failures: HashMap<String, VecDeque<String>>,
    latency: HashMap<String, Duration>,
}

impl MockBackend {
    /// Construct an empty mock; every operation succeeds with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a search page to serve on the next `search` call.
    pub fn enqueue_page(&self, page: SearchPage) {
        self.lock().pages.push_back(page);
    }

    /// Queue a receipt to serve on the next `download` call.
    pub fn enqueue_receipt(&self, receipt: DownloadReceipt) {
        self.lock().receipts.push_back(receipt);
    }

    /// Queue a task snapshot to serve on the next `list_tasks` call.
    ///
    /// The final queued snapshot keeps being served once the queue drains.
    pub fn enqueue_snapshot(&self, tasks: Vec<DownloadTask>) {
        self.lock().snapshots.push_back(tasks);
    }

    /// Replace the platform directory served by `list_platforms`.
    pub fn set_platforms(&self, platforms: Vec<PlatformInfo>) {
        self.lock().platforms = platforms;
    }

    /// Queue a suggestion list to serve on the next `search_suggestions` call.
    pub fn enqueue_suggestions(&self, suggestions: Vec<String>) {
        self.lock().suggestions.push_back(suggestions);
    }

    /// Make the next call to `operation` fail with `message`.
    ///
    /// Queued failures are consumed before any canned response.
    pub fn fail_next(&self, operation: &str, message: &str) {
        self.lock()
            .failures
            .entry(operation.to_string())
            .or_default()
            .push_back(message.to_string());
    }

    /// Delay every response of `operation` by `latency`.
    pub fn set_latency(&self, operation: &str, latency: Duration) {
        self.lock().latency.insert(operation.to_string(), latency);
    }

    /// Operation names in the order they were invoked.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex has been poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// How many times `operation` has been invoked.
    #[must_use]
    pub fn call_count(&self, operation: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|name| name.as_str() == operation)
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock backend mutex poisoned")
    }

    /// Record the call and extract its scripted behaviour while holding the
    /// lock exactly once; any sleeping happens after the lock is released.
    fn begin(&self, operation: &str) -> (Option<String>, Option<Duration>) {
        let mut state = self.lock();
        state.calls.push(operation.to_string());
        let failure = state
            .failures
            .get_mut(operation)
            .and_then(VecDeque::pop_front);
        let latency = state.latency.get(operation).copied();
        (failure, latency)
    }
}

async fn settle(latency: Option<Duration>) {
    if let Some(delay) = latency {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl DownloadBackend for MockBackend {
    async fn search(&self, request: SearchRequest) -> anyhow::Result<SearchPage> {
        let (failure, latency) = self.begin("search");
        let canned = self.lock().pages.pop_front();
        settle(latency).await;
        if let Some(message) = failure {
            bail!(message);
        }
        Ok(canned.unwrap_or(SearchPage {
            items: Vec::new(),
            total: 0,
            page: request.page,
            page_size: request.page_size,
            total_pages: 0,
        }))
    }

    async fn download(&self, request: DownloadRequest) -> anyhow::Result<DownloadReceipt> {
        let (failure, latency) = self.begin("download");
        let canned = self.lock().receipts.pop_front();
        settle(latency).await;
        if let Some(message) = failure {
            bail!(message);
        }
        let _ = request;
        Ok(canned.unwrap_or_else(|| DownloadReceipt {
            task_id: Uuid::new_v4().to_string(),
            status: TaskStatus::Pending,
            message: None,
        }))
    }

    async fn pause_download(&self, task_id: &str) -> anyhow::Result<()> {
        let (failure, latency) = self.begin("pause_download");
        settle(latency).await;
        if let Some(message) = failure {
            bail!("{message}: {task_id}");
        }
        Ok(())
    }

    async fn resume_download(&self, task_id: &str) -> anyhow::Result<()> {
        let (failure, latency) = self.begin("resume_download");
        settle(latency).await;
        if let Some(message) = failure {
            bail!("{message}: {task_id}");
        }
        Ok(())
    }

    async fn cancel_download(&self, task_id: &str) -> anyhow::Result<()> {
        let (failure, latency) = self.begin("cancel_download");
        settle(latency).await;
        if let Some(message) = failure {
            bail!("{message}: {task_id}");
        }
        Ok(())
    }

    async fn list_tasks(&self) -> anyhow::Result<Vec<DownloadTask>> {
        let (failure, latency) = self.begin("list_tasks");
        let snapshot = {
            let mut state = self.lock();
            if state.snapshots.len() > 1 {
                state.snapshots.pop_front()
            } else {
                state.snapshots.front().cloned()
            }
        };
        settle(latency).await;
        if let Some(message) = failure {
            bail!(message);
        }
        Ok(snapshot.unwrap_or_default())
    }

    async fn list_platforms(&self) -> anyhow::Result<Vec<PlatformInfo>> {
        let (failure, latency) = self.begin("list_platforms");
        let platforms = self.lock().platforms.clone();
        settle(latency).await;
        if let Some(message) = failure {
            bail!(message);
        }
        Ok(platforms)
    }

    async fn search_suggestions(&self, query: &str, platform: &str) -> anyhow::Result<Vec<String>> {
        let (failure, latency) = self.begin("search_suggestions");
        let canned = self.lock().suggestions.pop_front();
        settle(latency).await;
        if let Some(message) = failure {
            bail!(message);
        }
        let _ = (query, platform);
        Ok(canned.unwrap_or_default())
    }
}
