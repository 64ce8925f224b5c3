//! Sample builders shared across suites.

use chrono::Utc;
use downpour_core::{DownloadTask, FileType, PlatformInfo, SearchPage, SearchResult};
use downpour_events::TaskStatus;
use uuid::Uuid;

/// Mint an id the way backends do: opaque and unique.
#[must_use]
pub fn unique_task_id() -> String {
    Uuid::new_v4().to_string()
}

/// A task snapshot with the given id and status; progress matches the status
/// (0 for pending, 100 for completed, 50 otherwise).
#[must_use]
pub fn sample_task(id: &str, status: TaskStatus) -> DownloadTask {
    let progress = match status {
        TaskStatus::Pending => 0.0,
        TaskStatus::Completed => 100.0,
        _ => 50.0,
    };
    task_with_progress(id, status, progress)
}

/// A task snapshot with explicit progress.
#[must_use]
pub fn task_with_progress(id: &str, status: TaskStatus, progress: f64) -> DownloadTask {
    let now = Utc::now();
    DownloadTask {
        id: id.to_string(),
        url: format!("https://example.com/items/{id}"),
        filename: format!("{id}.mp4"),
        file_type: FileType::Video,
        platform: "example".to_string(),
        status,
        progress,
        speed: Some("1.2 MB/s".to_string()),
        size: Some("120 MB".to_string()),
        downloaded: None,
        estimated_time: None,
        error_details: None,
        created_at: now,
        updated_at: now,
    }
}

/// A search result with the given id.
#[must_use]
pub fn sample_result(id: &str) -> SearchResult {
    SearchResult {
        id: id.to_string(),
        title: format!("Result {id}"),
        url: format!("https://example.com/watch/{id}"),
        platform: "example".to_string(),
        file_type: FileType::Video,
        duration: Some("3:45".to_string()),
        size: None,
        thumbnail: None,
        quality: Some("720p".to_string()),
        format: None,
        uploader: None,
        download_progress: None,
    }
}

/// `count` results with ids `r1..rN`.
#[must_use]
pub fn sample_results(count: usize) -> Vec<SearchResult> {
    (1..=count)
        .map(|index| sample_result(&format!("r{index}")))
        .collect()
}

/// One page of a larger result set, with pagination bookkeeping filled in.
#[must_use]
pub fn sample_page(items: Vec<SearchResult>, total: u64, page: u32, page_size: u32) -> SearchPage {
    let total_pages = if total == 0 {
        0
    } else {
        u32::try_from(total.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
    };
    SearchPage {
        items,
        total,
        page,
        page_size,
        total_pages,
    }
}

/// A platform descriptor supporting the given file types.
#[must_use]
pub fn sample_platform(id: &str, supported: Vec<FileType>) -> PlatformInfo {
    PlatformInfo {
        id: id.to_string(),
        name: id.to_uppercase(),
        icon: format!("{id}.svg"),
        description: None,
        supported_file_types: supported,
        is_enabled: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_page_computes_total_pages() {
        let page = sample_page(sample_results(10), 25, 1, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 10);

        let empty = sample_page(Vec::new(), 0, 1, 10);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn unique_task_ids_do_not_collide() {
        assert_ne!(unique_task_id(), unique_task_id());
    }
}
