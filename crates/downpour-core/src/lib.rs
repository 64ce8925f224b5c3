//! Backend-agnostic domain types and trait seams for the Downpour core.

pub mod model;
pub mod service;

pub use model::{
    BatchOutcome, DownloadReceipt, DownloadRequest, DownloadTask, FileType, PlatformInfo,
    SearchPage, SearchRequest, SearchResult, clamp_progress,
};
pub use service::{DownloadBackend, DownloadWorkflow, TaskInspector};
