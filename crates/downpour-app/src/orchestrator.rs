//! Workflow façade the embedding UI calls for download lifecycle control.

use std::sync::Arc;

use async_trait::async_trait;
use downpour_core::{
    BatchOutcome, DownloadRequest, DownloadTask, DownloadWorkflow, TaskInspector,
};
use downpour_events::TaskStatus;
use downpour_gateway::{GatewayResult, RpcGateway};
use downpour_tasks::TaskStore;
use tracing::info;

use crate::banner::ErrorBanner;

/// Drives user-initiated download actions: backend call first, then the
/// optimistic local transition, with failures routed to the error banner.
///
/// The next poll confirms or corrects every optimistic transition; a late
/// poll response can briefly undo one, which is accepted last-write-wins
/// behaviour rather than a defect.
pub struct DownloadOrchestrator {
    gateway: RpcGateway,
    tasks: Arc<TaskStore>,
    banner: Arc<ErrorBanner>,
}

impl DownloadOrchestrator {
    /// Assemble the façade over the shared gateway, store, and banner.
    #[must_use]
    pub fn new(gateway: RpcGateway, tasks: Arc<TaskStore>, banner: Arc<ErrorBanner>) -> Self {
        Self {
            gateway,
            tasks,
            banner,
        }
    }

    /// Start a download; on acceptance the pending task appears in the store
    /// immediately rather than waiting for the next poll.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the banner.
    pub async fn download(&self, request: DownloadRequest) -> GatewayResult<String> {
        let receipt = self
            .surface(self.gateway.download(request.clone()))
            .await?;
        info!(task_id = %receipt.task_id, url = %request.url, "download accepted");
        let task = DownloadTask::pending(receipt.task_id.clone(), &request);
        self.tasks.upsert(task).await;
        Ok(receipt.task_id)
    }

    /// Pause a task; the local transition happens once the backend agrees.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the banner.
    pub async fn pause(&self, task_id: &str) -> GatewayResult<()> {
        self.surface(self.gateway.pause_download(task_id)).await?;
        self.tasks.apply_status(task_id, TaskStatus::Paused).await;
        Ok(())
    }

    /// Resume a paused task.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the banner.
    pub async fn resume(&self, task_id: &str) -> GatewayResult<()> {
        self.surface(self.gateway.resume_download(task_id)).await?;
        self.tasks
            .apply_status(task_id, TaskStatus::Downloading)
            .await;
        Ok(())
    }

    /// Cancel a task.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the banner.
    pub async fn cancel(&self, task_id: &str) -> GatewayResult<()> {
        self.surface(self.gateway.cancel_download(task_id)).await?;
        self.tasks
            .apply_status(task_id, TaskStatus::Cancelled)
            .await;
        Ok(())
    }

    /// Run a batch of downloads sequentially, one outcome per item; a
    /// failing item never aborts the rest.
    pub async fn batch(&self, requests: Vec<DownloadRequest>) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            let (url, filename) = (request.url.clone(), request.filename.clone());
            let outcome = match self.download(request).await {
                Ok(task_id) => BatchOutcome {
                    url,
                    filename,
                    task_id: Some(task_id),
                    error: None,
                },
                Err(err) => BatchOutcome {
                    url,
                    filename,
                    task_id: None,
                    error: Some(err.banner_message()),
                },
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn surface<T>(
        &self,
        call: impl Future<Output = GatewayResult<T>> + Send,
    ) -> GatewayResult<T> {
        match call.await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.banner.raise(err.banner_message());
                Err(err)
            }
        }
    }
}

#[async_trait]
impl DownloadWorkflow for DownloadOrchestrator {
    async fn start_download(&self, request: DownloadRequest) -> anyhow::Result<String> {
        Ok(self.download(request).await?)
    }

    async fn start_batch(&self, requests: Vec<DownloadRequest>) -> Vec<BatchOutcome> {
        self.batch(requests).await
    }

    async fn pause_task(&self, task_id: &str) -> anyhow::Result<()> {
        Ok(self.pause(task_id).await?)
    }

    async fn resume_task(&self, task_id: &str) -> anyhow::Result<()> {
        Ok(self.resume(task_id).await?)
    }

    async fn cancel_task(&self, task_id: &str) -> anyhow::Result<()> {
        Ok(self.cancel(task_id).await?)
    }

    async fn remove_task(&self, task_id: &str) -> anyhow::Result<()> {
        self.tasks.remove(task_id).await;
        Ok(())
    }

    async fn clear_finished(&self) -> anyhow::Result<usize> {
        Ok(self.tasks.clear_terminal().await)
    }
}

#[async_trait]
impl TaskInspector for DownloadOrchestrator {
    async fn list(&self) -> anyhow::Result<Vec<DownloadTask>> {
        Ok(self.tasks.list().await)
    }

    async fn get(&self, task_id: &str) -> anyhow::Result<Option<DownloadTask>> {
        Ok(self.tasks.get(task_id).await)
    }
}
