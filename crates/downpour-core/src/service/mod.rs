//! Trait seams between the front-end core, the backend transport, and the UI.

use crate::model::{
    BatchOutcome, DownloadReceipt, DownloadRequest, DownloadTask, PlatformInfo, SearchPage,
    SearchRequest,
};
use anyhow::bail;
use async_trait::async_trait;

/// Raw transport boundary to the native backend process.
///
/// Every method is one RPC-style call over the IPC bridge. Errors are opaque
/// human-readable failures; callers must treat them as non-retryable by
/// default.
#[async_trait]
pub trait DownloadBackend: Send + Sync {
    /// Execute a platform search and return one page of results.
    async fn search(&self, request: SearchRequest) -> anyhow::Result<SearchPage>;

    /// Ask the backend to start a download.
    async fn download(&self, request: DownloadRequest) -> anyhow::Result<DownloadReceipt>;

    /// Suspend an active task.
    async fn pause_download(&self, task_id: &str) -> anyhow::Result<()>;

    /// Resume a paused task.
    async fn resume_download(&self, task_id: &str) -> anyhow::Result<()>;

    /// Abandon a task.
    async fn cancel_download(&self, task_id: &str) -> anyhow::Result<()>;

    /// Fetch the authoritative snapshot of all tasks the backend tracks.
    async fn list_tasks(&self) -> anyhow::Result<Vec<DownloadTask>>;

    /// Fetch the platform directory.
    async fn list_platforms(&self) -> anyhow::Result<Vec<PlatformInfo>>;

    /// Fetch typeahead suggestions; default implementation reports lack of
    /// support, as not every backend exposes this call.
    async fn search_suggestions(&self, query: &str, platform: &str) -> anyhow::Result<Vec<String>> {
        let _ = (query, platform);
        bail!("search suggestions not supported by this backend");
    }
}

/// Workflow façade exposed to the embedding UI for download lifecycle control.
#[async_trait]
pub trait DownloadWorkflow: Send + Sync {
    /// Start a download and return the backend-assigned task id.
    async fn start_download(&self, request: DownloadRequest) -> anyhow::Result<String>;

    /// Start a batch of downloads, collecting per-item outcomes without
    /// aborting the batch on individual failures.
    async fn start_batch(&self, requests: Vec<DownloadRequest>) -> Vec<BatchOutcome>;

    /// Pause a task, applying the optimistic local transition on success.
    async fn pause_task(&self, task_id: &str) -> anyhow::Result<()>;

    /// Resume a task, applying the optimistic local transition on success.
    async fn resume_task(&self, task_id: &str) -> anyhow::Result<()>;

    /// Cancel a task, applying the optimistic local transition on success.
    async fn cancel_task(&self, task_id: &str) -> anyhow::Result<()>;

    /// Remove a task from the local store. Local bookkeeping only.
    async fn remove_task(&self, task_id: &str) -> anyhow::Result<()>;

    /// Remove every terminal task from the local store, returning the count.
    async fn clear_finished(&self) -> anyhow::Result<usize>;
}

/// Read-side view of the task catalog used by UI consumers.
#[async_trait]
pub trait TaskInspector: Send + Sync {
    /// Retrieve the full task list.
    async fn list(&self) -> anyhow::Result<Vec<DownloadTask>>;

    /// Retrieve an individual task snapshot.
    async fn get(&self, task_id: &str) -> anyhow::Result<Option<DownloadTask>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileType;
    use async_trait::async_trait;

    struct StubBackend;

    #[async_trait]
    impl DownloadBackend for StubBackend {
        async fn search(&self, _request: SearchRequest) -> anyhow::Result<SearchPage> {
            Ok(SearchPage::default())
        }

        async fn download(&self, request: DownloadRequest) -> anyhow::Result<DownloadReceipt> {
            let _ = request;
            bail!("stub backend accepts nothing");
        }

        async fn pause_download(&self, _task_id: &str) -> anyhow::Result<()> {
            Ok(())
        }

        async fn resume_download(&self, _task_id: &str) -> anyhow::Result<()> {
            Ok(())
        }

        async fn cancel_download(&self, _task_id: &str) -> anyhow::Result<()> {
            Ok(())
        }

        async fn list_tasks(&self) -> anyhow::Result<Vec<DownloadTask>> {
            Ok(Vec::new())
        }

        async fn list_platforms(&self) -> anyhow::Result<Vec<PlatformInfo>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn suggestions_default_reports_lack_of_support() {
        let backend = StubBackend;
        let err = backend
            .search_suggestions("lo-fi beats", "all")
            .await
            .expect_err("default suggestions should error");
        assert!(err.to_string().contains("not supported"));
    }

    #[tokio::test]
    async fn stub_backend_search_returns_empty_page() {
        let backend = StubBackend;
        let page = backend
            .search(SearchRequest {
                query: "test".into(),
                file_type: FileType::Video,
                platform: "all".into(),
                page: 1,
                page_size: 10,
            })
            .await
            .expect("stub search should succeed");
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }
}
