//! Assembly of the front-end core for an embedding shell.

use std::sync::Arc;

use downpour_config::{AppProfile, validate_profile};
use downpour_core::DownloadBackend;
use downpour_events::EventBus;
use downpour_gateway::RpcGateway;
use downpour_search::SearchSession;
use downpour_tasks::{Poller, PollerHandle, TaskStore};
use downpour_telemetry::{LogFormat, LoggingConfig, Metrics, init_logging, log_format_from_config};
use tracing::info;

use crate::banner::ErrorBanner;
use crate::error::{AppError, AppResult};
use crate::orchestrator::DownloadOrchestrator;
use crate::platforms::PlatformDirectory;

/// The wired front-end core, ready for an embedding shell to drive.
///
/// Everything is shared and cheap to clone where the UI needs it; the
/// stores stay the single source of truth.
pub struct AppCore {
    /// Profile the core was assembled from.
    pub profile: AppProfile,
    /// Bus the stores publish state changes on.
    pub events: EventBus,
    /// Shared metrics registry.
    pub metrics: Metrics,
    /// Validating gateway over the backend transport.
    pub gateway: RpcGateway,
    /// Task catalog the UI renders from.
    pub tasks: Arc<TaskStore>,
    /// Search state machine.
    pub session: Arc<SearchSession>,
    /// Session-cached platform directory.
    pub platforms: Arc<PlatformDirectory>,
    /// Workflow façade for user actions.
    pub orchestrator: Arc<DownloadOrchestrator>,
    /// The single user-facing failure slot.
    pub banner: Arc<ErrorBanner>,
}

/// Install the tracing subscriber according to the profile.
///
/// Call once per process, before [`bootstrap`]; embedding shells that manage
/// their own subscriber can skip it.
///
/// # Errors
///
/// Returns [`AppError::Telemetry`] when the subscriber cannot be installed.
pub fn init_telemetry(profile: &AppProfile) -> AppResult<()> {
    let config = LoggingConfig {
        level: &profile.log_level,
        format: log_format_from_config(profile.log_format.as_deref())
            .unwrap_or_else(LogFormat::infer),
    };
    init_logging(&config).map_err(|source| AppError::Telemetry {
        operation: "telemetry.init_logging",
        source,
    })
}

/// Wire the core against a backend transport.
///
/// Nothing polls until [`AppCore::start_polling`] is called, so a shell can
/// assemble the core eagerly and subscribe lazily.
///
/// # Errors
///
/// Returns [`AppError::Profile`] for an out-of-range profile and
/// [`AppError::Telemetry`] when the metrics registry cannot be built.
pub fn bootstrap(profile: AppProfile, transport: Arc<dyn DownloadBackend>) -> AppResult<AppCore> {
    validate_profile(&profile).map_err(|source| AppError::Profile { source })?;
    let events = EventBus::new();
    let metrics = Metrics::new().map_err(|source| AppError::Telemetry {
        operation: "telemetry.metrics",
        source,
    })?;
    let gateway = RpcGateway::new(transport).with_metrics(metrics.clone());
    let tasks = Arc::new(TaskStore::new(events.clone(), profile.retention()));
    let session = Arc::new(
        SearchSession::new(gateway.clone(), events.clone(), profile.page_size)
            .with_metrics(metrics.clone()),
    );
    let platforms = Arc::new(PlatformDirectory::new(gateway.clone()));
    let banner = Arc::new(ErrorBanner::new());
    let orchestrator = Arc::new(DownloadOrchestrator::new(
        gateway.clone(),
        tasks.clone(),
        banner.clone(),
    ));

    info!(
        poll_interval_secs = profile.poll_interval_secs,
        page_size = profile.page_size,
        "front-end core assembled"
    );

    Ok(AppCore {
        profile,
        events,
        metrics,
        gateway,
        tasks,
        session,
        platforms,
        orchestrator,
        banner,
    })
}

impl AppCore {
    /// Spawn the task poller and return the first subscriber handle.
    ///
    /// Clone the handle per mounted consumer; polling winds down when the
    /// last clone drops.
    #[must_use]
    pub fn start_polling(&self) -> PollerHandle {
        Poller::new(
            self.gateway.clone(),
            self.tasks.clone(),
            self.events.clone(),
            self.metrics.clone(),
            self.profile.poll_interval(),
        )
        .start()
    }
}
