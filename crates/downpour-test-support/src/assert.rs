//! Assertion helpers for task snapshots.

use downpour_core::DownloadTask;
use downpour_events::TaskStatus;

/// Assert a task's status, with a readable failure message.
///
/// # Panics
///
/// Panics when the status differs.
#[track_caller]
pub fn assert_status(task: &DownloadTask, expected: TaskStatus) {
    assert_eq!(
        task.status, expected,
        "task {} expected status {expected:?}, found {:?}",
        task.id, task.status
    );
}

/// Assert a task's progress within floating-point tolerance.
///
/// # Panics
///
/// Panics when the progress differs by more than 1e-6.
#[track_caller]
pub fn assert_progress(task: &DownloadTask, expected: f64) {
    assert!(
        (task.progress - expected).abs() < 1e-6,
        "task {} expected progress {expected}, found {}",
        task.id,
        task.progress
    );
}
