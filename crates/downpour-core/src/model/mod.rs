//! Core download domain types and DTOs shared across the workspace.

use chrono::{DateTime, Utc};
use downpour_events::TaskStatus;
use serde::{Deserialize, Serialize};

/// Broad category of the file a task or result refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// Music and other audio content.
    Audio,
    /// Video content.
    Video,
    /// Text documents, ebooks, spreadsheets.
    Document,
    /// Installers and executables.
    Software,
    /// Pictures and photos.
    Image,
    /// Compressed bundles.
    Archive,
    /// Anything the backend could not classify.
    #[default]
    Other,
}

impl FileType {
    /// Snake-case label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Document => "document",
            Self::Software => "software",
            Self::Image => "image",
            Self::Archive => "archive",
            Self::Other => "other",
        }
    }
}

/// Clamp a backend-reported progress value into the visible [0, 100] range.
///
/// Backends occasionally report transient values slightly outside the range
/// (or NaN while probing); those must never reach the UI.
#[must_use]
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// A single tracked download operation, identified by a backend-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadTask {
    /// Opaque backend-assigned identifier, unique per task.
    pub id: String,
    /// Source URL; immutable after creation.
    pub url: String,
    /// Target filename; immutable after creation.
    pub filename: String,
    /// Category of the downloaded content.
    pub file_type: FileType,
    /// Identifier of the platform the content comes from.
    pub platform: String,
    /// Current lifecycle state.
    pub status: TaskStatus,
    /// Completion percentage in [0, 100].
    pub progress: f64,
    /// Backend-supplied transfer rate, for display only.
    pub speed: Option<String>,
    /// Backend-supplied total size, for display only.
    pub size: Option<String>,
    /// Backend-supplied transferred amount, for display only.
    pub downloaded: Option<String>,
    /// Backend-supplied remaining-time estimate, for display only.
    pub estimated_time: Option<String>,
    /// Failure description; meaningful only when the status is failed.
    pub error_details: Option<String>,
    /// Timestamp when the task was created locally.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last reconciliation touching this task.
    pub updated_at: DateTime<Utc>,
}

impl DownloadTask {
    /// Build the local pending snapshot for a freshly accepted download.
    #[must_use]
    pub fn pending(task_id: impl Into<String>, request: &DownloadRequest) -> Self {
        let now = Utc::now();
        Self {
            id: task_id.into(),
            url: request.url.clone(),
            filename: request.filename.clone(),
            file_type: request.file_type,
            platform: request.platform.clone(),
            status: TaskStatus::Pending,
            progress: 0.0,
            speed: None,
            size: None,
            downloaded: None,
            estimated_time: None,
            error_details: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the task reached a state that admits no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// A single entry in a search response.
///
/// Result ids are unique within one response only; they are not durable
/// across searches and must not be treated as task identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier unique within the enclosing response.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Canonical URL of the item.
    pub url: String,
    /// Identifier of the platform the item was found on.
    pub platform: String,
    /// Category of the item's content.
    pub file_type: FileType,
    /// Playback length, when the platform reports one.
    pub duration: Option<String>,
    /// Approximate size, when the platform reports one.
    pub size: Option<String>,
    /// Thumbnail URL, when available.
    pub thumbnail: Option<String>,
    /// Quality label (e.g. "1080p"), when available.
    pub quality: Option<String>,
    /// Container or codec label, when available.
    pub format: Option<String>,
    /// Uploader or author name, when available.
    pub uploader: Option<String>,
    /// Transient progress of a task the UI soft-linked to this result.
    pub download_progress: Option<f64>,
}

impl SearchResult {
    /// Build the download request the UI issues for this result: the title
    /// becomes the filename, everything else carries over.
    #[must_use]
    pub fn to_download_request(&self) -> DownloadRequest {
        DownloadRequest {
            url: self.url.clone(),
            filename: self.title.clone(),
            file_type: self.file_type,
            platform: self.platform.clone(),
        }
    }
}

/// Static-ish descriptor of a search/download platform.
///
/// Fetched once per session and cached; never mutated by this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Stable platform identifier (e.g. "youtube").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon identifier or URL for the UI.
    pub icon: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// File types the platform can serve.
    #[serde(default)]
    pub supported_file_types: Vec<FileType>,
    /// Whether the platform is currently usable.
    #[serde(default = "default_true")]
    pub is_enabled: bool,
}

const fn default_true() -> bool {
    true
}

impl PlatformInfo {
    /// Whether the platform serves the given file type.
    #[must_use]
    pub fn supports(&self, file_type: FileType) -> bool {
        self.supported_file_types.contains(&file_type)
    }
}

/// Parameters of one search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    /// Requested content category.
    pub file_type: FileType,
    /// Platform identifier, or "all" for a cross-platform search.
    pub platform: String,
    /// One-based page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
}

/// One page of search results together with pagination bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Results on this page.
    pub items: Vec<SearchResult>,
    /// Total matches across all pages.
    pub total: u64,
    /// One-based page number this page corresponds to.
    pub page: u32,
    /// Page size the backend applied.
    pub page_size: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

/// Parameters of one download call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Source URL to hand to the backend.
    pub url: String,
    /// Filename the backend should write to.
    pub filename: String,
    /// Category of the content.
    pub file_type: FileType,
    /// Platform identifier the URL belongs to.
    pub platform: String,
}

/// Backend acknowledgement of an accepted download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadReceipt {
    /// Backend-assigned identifier of the new task.
    pub task_id: String,
    /// Initial status; always pending for a fresh task.
    pub status: TaskStatus,
    /// Optional human-readable note from the backend.
    pub message: Option<String>,
}

/// Per-item outcome of a batch download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// URL of the item the outcome refers to.
    pub url: String,
    /// Filename requested for the item.
    pub filename: String,
    /// Task id when the item was accepted.
    pub task_id: Option<String>,
    /// Failure description when the item was rejected.
    pub error: Option<String>,
}

impl BatchOutcome {
    /// Whether this item was accepted by the backend.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.task_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> DownloadRequest {
        DownloadRequest {
            url: "https://example.com/clip".into(),
            filename: "clip.mp4".into(),
            file_type: FileType::Video,
            platform: "example".into(),
        }
    }

    #[test]
    fn pending_snapshot_starts_clean() {
        let task = DownloadTask::pending("t-1", &sample_request());
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.progress.abs() < f64::EPSILON);
        assert!(task.error_details.is_none());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn progress_clamps_out_of_range_values() {
        assert!((clamp_progress(141.5) - 100.0).abs() < f64::EPSILON);
        assert!(clamp_progress(-3.0).abs() < f64::EPSILON);
        assert!(clamp_progress(f64::NAN).abs() < f64::EPSILON);
        assert!((clamp_progress(42.0) - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn platform_info_defaults_enabled() {
        let parsed: PlatformInfo = serde_json::from_str(
            r#"{"id":"yt","name":"YouTube","icon":"yt.svg","description":null}"#,
        )
        .expect("platform info should parse");
        assert!(parsed.is_enabled);
        assert!(parsed.supported_file_types.is_empty());
        assert!(!parsed.supports(FileType::Video));
    }

    #[test]
    fn file_type_serializes_snake_case() {
        let value = serde_json::to_string(&FileType::Software).expect("serialize");
        assert_eq!(value, r#""software""#);
    }
}
