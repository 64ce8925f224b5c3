//! The typed async boundary in front of the backend transport.

use std::sync::Arc;

use downpour_core::{
    DownloadBackend, DownloadReceipt, DownloadRequest, DownloadTask, PlatformInfo, SearchPage,
    SearchRequest,
};
use downpour_events::TaskStatus;
use downpour_telemetry::Metrics;
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};
use crate::validate;

/// Stateless façade that validates inputs, dispatches to the backend
/// transport, and normalizes failures into [`GatewayError`].
///
/// The gateway never retries; retry policy belongs to the caller (the poller
/// retries on its own schedule, user-triggered actions surface the error
/// once).
#[derive(Clone)]
pub struct RpcGateway {
    transport: Arc<dyn DownloadBackend>,
    metrics: Option<Metrics>,
}

impl RpcGateway {
    /// Wrap a backend transport.
    #[must_use]
    pub fn new(transport: Arc<dyn DownloadBackend>) -> Self {
        Self {
            transport,
            metrics: None,
        }
    }

    /// Attach a metrics registry recording calls by operation and outcome.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Execute a validated platform search.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] without touching the backend when
    /// the request is malformed, or [`GatewayError::Backend`] when the call
    /// fails.
    pub async fn search(&self, request: SearchRequest) -> GatewayResult<SearchPage> {
        Self::reject_invalid(validate::search_request(&request))?;
        debug!(query = %request.query, page = request.page, "dispatching search");
        self.dispatch("search", self.transport.search(request)).await
    }

    /// Ask the backend to start a validated download.
    ///
    /// The receipt status is normalized to pending regardless of backend
    /// phrasing; a fresh task is pending by definition.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] or [`GatewayError::Backend`].
    pub async fn download(&self, request: DownloadRequest) -> GatewayResult<DownloadReceipt> {
        Self::reject_invalid(validate::download_request(&request))?;
        debug!(url = %request.url, filename = %request.filename, "dispatching download");
        let mut receipt = self
            .dispatch("download", self.transport.download(request))
            .await?;
        receipt.status = TaskStatus::Pending;
        Ok(receipt)
    }

    /// Suspend an active task.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] or [`GatewayError::Backend`].
    pub async fn pause_download(&self, task_id: &str) -> GatewayResult<()> {
        Self::reject_invalid(validate::task_id(task_id))?;
        self.dispatch("pause_download", self.transport.pause_download(task_id))
            .await
    }

    /// Resume a paused task.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] or [`GatewayError::Backend`].
    pub async fn resume_download(&self, task_id: &str) -> GatewayResult<()> {
        Self::reject_invalid(validate::task_id(task_id))?;
        self.dispatch("resume_download", self.transport.resume_download(task_id))
            .await
    }

    /// Abandon a task.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] or [`GatewayError::Backend`].
    pub async fn cancel_download(&self, task_id: &str) -> GatewayResult<()> {
        Self::reject_invalid(validate::task_id(task_id))?;
        self.dispatch("cancel_download", self.transport.cancel_download(task_id))
            .await
    }

    /// Fetch the authoritative task snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Backend`] when the call fails.
    pub async fn list_tasks(&self) -> GatewayResult<Vec<DownloadTask>> {
        self.dispatch("list_tasks", self.transport.list_tasks())
            .await
    }

    /// Fetch the platform directory.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Backend`] when the call fails.
    pub async fn list_platforms(&self) -> GatewayResult<Vec<PlatformInfo>> {
        self.dispatch("list_platforms", self.transport.list_platforms())
            .await
    }

    /// Fetch typeahead suggestions for a validated query.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] or [`GatewayError::Backend`].
    pub async fn search_suggestions(
        &self,
        query: &str,
        platform: &str,
    ) -> GatewayResult<Vec<String>> {
        Self::reject_invalid(validate::suggestion_request(query, platform))?;
        self.dispatch(
            "search_suggestions",
            self.transport.search_suggestions(query, platform),
        )
        .await
    }

    fn reject_invalid(violations: Vec<String>) -> GatewayResult<()> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::Validation { violations })
        }
    }

    async fn dispatch<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = anyhow::Result<T>> + Send,
    ) -> GatewayResult<T> {
        let outcome = call.await;
        if let Some(metrics) = &self.metrics {
            metrics.record_backend_call(operation, outcome.is_ok());
        }
        outcome.map_err(|source| GatewayError::Backend { operation, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use downpour_core::FileType;
    use downpour_test_support::mocks::MockBackend;

    fn search_request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.into(),
            file_type: FileType::Video,
            platform: "all".into(),
            page: 1,
            page_size: 10,
        }
    }

    #[tokio::test]
    async fn empty_query_never_reaches_backend() {
        let backend = Arc::new(MockBackend::new());
        let gateway = RpcGateway::new(backend.clone());

        let err = gateway
            .search(search_request(""))
            .await
            .expect_err("empty query must be rejected");
        assert!(err.is_validation());
        assert_eq!(backend.calls(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn backend_failure_names_the_operation() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_next("list_tasks", "bridge went away");
        let gateway = RpcGateway::new(backend);

        let err = gateway
            .list_tasks()
            .await
            .expect_err("injected failure must surface");
        match err {
            GatewayError::Backend { operation, source } => {
                assert_eq!(operation, "list_tasks");
                assert!(source.to_string().contains("bridge went away"));
            }
            GatewayError::Validation { .. } => panic!("expected backend error"),
        }
    }

    #[tokio::test]
    async fn download_receipt_is_normalized_to_pending() {
        let backend = Arc::new(MockBackend::new());
        backend.enqueue_receipt(DownloadReceipt {
            task_id: "t1".into(),
            status: TaskStatus::Downloading,
            message: None,
        });
        let gateway = RpcGateway::new(backend);

        let receipt = gateway
            .download(DownloadRequest {
                url: "https://x/y".into(),
                filename: "a.mp4".into(),
                file_type: FileType::Video,
                platform: "x".into(),
            })
            .await
            .expect("download should be accepted");
        assert_eq!(receipt.task_id, "t1");
        assert_eq!(receipt.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn suggestions_require_a_query() {
        let backend = Arc::new(MockBackend::new());
        let gateway = RpcGateway::new(backend.clone());

        let err = gateway
            .search_suggestions("  ", "all")
            .await
            .expect_err("blank query must be rejected");
        assert!(err.is_validation());
        assert_eq!(backend.calls(), Vec::<String>::new());

        backend.enqueue_suggestions(vec!["lo-fi hip hop".to_string()]);
        let suggestions = gateway
            .search_suggestions("lo", "all")
            .await
            .expect("suggestions should flow through");
        assert_eq!(suggestions, vec!["lo-fi hip hop".to_string()]);
    }

    #[tokio::test]
    async fn invalid_download_lists_every_violation() {
        let gateway = RpcGateway::new(Arc::new(MockBackend::new()));

        let err = gateway
            .download(DownloadRequest {
                url: "nope".into(),
                filename: "".into(),
                file_type: FileType::Video,
                platform: "x".into(),
            })
            .await
            .expect_err("malformed download must be rejected");
        match err {
            GatewayError::Validation { violations } => assert_eq!(violations.len(), 2),
            GatewayError::Backend { .. } => panic!("expected validation error"),
        }
    }
}
