//! Query, filter, and pagination state for the search surface.

use std::sync::atomic::{AtomicU64, Ordering};

use downpour_core::{FileType, SearchRequest, SearchResult};
use downpour_events::{Event, EventBus};
use downpour_gateway::{GatewayError, GatewayResult, RpcGateway};
use downpour_telemetry::Metrics;
use tokio::sync::Mutex;
use tracing::debug;

use crate::selection::SelectionManager;

/// Platform filter meaning "search everywhere".
const ALL_PLATFORMS: &str = "all";

/// Holds the active search and its latest result page.
///
/// The invariant maintained throughout: the cached result set corresponds to
/// exactly one (query, file type, platform, page) tuple. Anything that
/// changes the tuple clears the selection, and an in-flight response for an
/// older tuple is discarded via a generation counter re-checked after every
/// suspension point.
pub struct SearchSession {
    gateway: RpcGateway,
    events: EventBus,
    metrics: Option<Metrics>,
    state: Mutex<SessionState>,
    generation: AtomicU64,
}

struct SessionState {
    query: String,
    file_type: FileType,
    platform: String,
    page: u32,
    page_size: u32,
    results: Vec<SearchResult>,
    total: u64,
    total_pages: u32,
    selection: SelectionManager,
}

/// Cloned view of the session for rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Query the cached results belong to.
    pub query: String,
    /// File-type filter in effect.
    pub file_type: FileType,
    /// Platform filter in effect.
    pub platform: String,
    /// One-based page the results belong to.
    pub page: u32,
    /// Page size used for requests.
    pub page_size: u32,
    /// Results of the latest successful search.
    pub results: Vec<SearchResult>,
    /// Total matches across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Ids currently selected for a batch action.
    pub selected: Vec<String>,
}

impl SearchSession {
    /// Create a session with no query and an empty result set.
    #[must_use]
    pub fn new(gateway: RpcGateway, events: EventBus, page_size: u32) -> Self {
        Self {
            gateway,
            events,
            metrics: None,
            state: Mutex::new(SessionState {
                query: String::new(),
                file_type: FileType::Audio,
                platform: ALL_PLATFORMS.to_string(),
                page: 1,
                page_size,
                results: Vec::new(),
                total: 0,
                total_pages: 0,
                selection: SelectionManager::new(),
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Attach a metrics registry counting successful searches.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Issue a fresh search, resetting the page to 1.
    ///
    /// On success the cached results are replaced; on a backend failure they
    /// are cleared so a new, failed query never shows another query's
    /// results. A validation failure leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] or [`GatewayError::Backend`].
    pub async fn search(
        &self,
        query: &str,
        file_type: FileType,
        platform: &str,
    ) -> GatewayResult<()> {
        let page_size = self.state.lock().await.page_size;
        let request = SearchRequest {
            query: query.trim().to_string(),
            file_type,
            platform: platform.to_string(),
            page: 1,
            page_size,
        };
        let generation = self.bump_generation();
        self.run(request, generation).await
    }

    /// Move to another page of the current query, clamping out-of-range
    /// targets into the valid window instead of rejecting them.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] or [`GatewayError::Backend`].
    pub async fn change_page(&self, page: u32) -> GatewayResult<()> {
        let request = {
            let state = self.state.lock().await;
            SearchRequest {
                query: state.query.clone(),
                file_type: state.file_type,
                platform: state.platform.clone(),
                page: clamp_page(page, state.total_pages),
                page_size: state.page_size,
            }
        };
        let generation = self.bump_generation();
        self.run(request, generation).await
    }

    /// Switch the file-type filter: clears results and selection and resets
    /// the page, but does not re-search on its own (clear-and-wait).
    pub async fn set_file_type(&self, file_type: FileType) {
        let mut state = self.state.lock().await;
        if state.file_type == file_type {
            return;
        }
        state.file_type = file_type;
        reset_results(&mut state);
        self.bump_generation();
    }

    /// Switch the platform filter: clears results and selection and resets
    /// the page, but does not re-search on its own (clear-and-wait).
    pub async fn set_platform(&self, platform: &str) {
        let mut state = self.state.lock().await;
        if state.platform == platform {
            return;
        }
        state.platform = platform.to_string();
        reset_results(&mut state);
        self.bump_generation();
    }

    /// Flip one result's selection; returns whether it is now selected.
    pub async fn toggle_selection(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        let now_selected = state.selection.toggle(id);
        let _ = self.events.publish(Event::SelectionChanged {
            selected: state.selection.len(),
        });
        now_selected
    }

    /// Select the whole page, or clear the selection when everything is
    /// already selected.
    pub async fn select_all(&self) {
        let mut state = self.state.lock().await;
        let SessionState {
            results, selection, ..
        } = &mut *state;
        selection.select_all(results);
        let _ = self.events.publish(Event::SelectionChanged {
            selected: selection.len(),
        });
    }

    /// Drop the whole selection.
    pub async fn clear_selection(&self) {
        let mut state = self.state.lock().await;
        state.selection.clear();
        let _ = self.events.publish(Event::SelectionChanged { selected: 0 });
    }

    /// Ids currently selected, in a stable order.
    pub async fn selected_ids(&self) -> Vec<String> {
        self.state.lock().await.selection.ids()
    }

    /// The selected results themselves, for building a batch download.
    pub async fn selected_results(&self) -> Vec<SearchResult> {
        let state = self.state.lock().await;
        state
            .results
            .iter()
            .filter(|result| state.selection.is_selected(&result.id))
            .cloned()
            .collect()
    }

    /// Cloned view of the current session for rendering.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            query: state.query.clone(),
            file_type: state.file_type,
            platform: state.platform.clone(),
            page: state.page,
            page_size: state.page_size,
            results: state.results.clone(),
            total: state.total,
            total_pages: state.total_pages,
            selected: state.selection.ids(),
        }
    }

    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn run(&self, request: SearchRequest, generation: u64) -> GatewayResult<()> {
        let query = request.query.clone();
        let file_type = request.file_type;
        let platform = request.platform.clone();
        let page = request.page;

        let outcome = self.gateway.search(request).await;

        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(query = %query, "discarding stale search response");
            return Ok(());
        }

        match outcome {
            Ok(result_page) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_search();
                }
                state.query = query.clone();
                state.file_type = file_type;
                state.platform = platform;
                state.page = page;
                state.results = result_page.items;
                state.total = result_page.total;
                state.total_pages = result_page.total_pages;
                state.selection.clear();
                let _ = self.events.publish(Event::SearchCompleted {
                    query,
                    total: result_page.total,
                    page,
                });
                Ok(())
            }
            Err(err @ GatewayError::Validation { .. }) => Err(err),
            Err(err) => {
                state.query = query.clone();
                state.file_type = file_type;
                state.platform = platform;
                reset_results(&mut state);
                let _ = self.events.publish(Event::SearchFailed {
                    query,
                    message: err.banner_message(),
                });
                Err(err)
            }
        }
    }
}

fn reset_results(state: &mut SessionState) {
    state.results.clear();
    state.total = 0;
    state.total_pages = 0;
    state.page = 1;
    state.selection.clear();
}

fn clamp_page(requested: u32, total_pages: u32) -> u32 {
    requested.clamp(1, total_pages.max(1))
}
