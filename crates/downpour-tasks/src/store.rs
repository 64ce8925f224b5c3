//! Observable catalog of download tasks, reconciled against backend snapshots.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use downpour_core::{DownloadTask, FileType, clamp_progress};
use downpour_events::{Event, EventBus, TaskStatus};
use tokio::sync::RwLock;
use tracing::debug;

/// Single source of truth for the tasks the UI renders.
///
/// All mutation goes through the methods below; each method takes the write
/// lock exactly once, so no multi-step mutation spans a suspension point.
/// Subscribers observe changes through the event bus.
pub struct TaskStore {
    entries: RwLock<HashMap<String, DownloadTask>>,
    events: EventBus,
    retention: chrono::Duration,
}

impl TaskStore {
    /// Create an empty store.
    ///
    /// `retention` is how long a terminal task missing from server snapshots
    /// is kept before reconciliation may drop it; one poll interval is the
    /// intended value.
    #[must_use]
    pub fn new(events: EventBus, retention: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            events,
            retention: chrono::Duration::from_std(retention)
                .unwrap_or_else(|_| chrono::Duration::seconds(5)),
        }
    }

    /// Insert a task, or merge it into the existing entry with the same id.
    ///
    /// Required fields overwrite; optional display fields only overwrite when
    /// the incoming value is present, so a sparse snapshot cannot blank out
    /// details a richer one already provided. `updated_at` never moves
    /// backwards. Upserting the same snapshot twice is idempotent.
    pub async fn upsert(&self, task: DownloadTask) {
        let mut entries = self.entries.write().await;
        self.merge_entry(&mut entries, task, Utc::now());
    }

    /// Apply an optimistic status transition after a user action.
    ///
    /// Unknown ids are a no-op rather than an error: the task may have been
    /// deleted between the user's action and this call, and the next poll
    /// will settle the truth either way.
    pub async fn apply_status(&self, task_id: &str, status: TaskStatus) {
        let mut entries = self.entries.write().await;
        let Some(task) = entries.get_mut(task_id) else {
            debug!(task_id, "optimistic transition for unknown task ignored");
            return;
        };
        task.status = status;
        task.updated_at = advance(task.updated_at, Utc::now());
        let event = Event::TaskUpserted {
            task_id: task.id.clone(),
            status: task.status,
            progress: task.progress,
        };
        let _ = self.events.publish(event);
    }

    /// Merge a complete backend snapshot into the store.
    ///
    /// Tasks present in the snapshot overwrite local state (server wins,
    /// optimistic transitions included). Tasks known locally but absent from
    /// the snapshot are only dropped once they are terminal and have been
    /// stable for longer than the retention window; a non-terminal task that
    /// is merely delayed in a partial server response survives.
    ///
    /// Callers must not invoke this for failed polls; a failed poll leaves
    /// the store untouched by never reaching this method.
    pub async fn reconcile(&self, server_tasks: Vec<DownloadTask>) {
        let now = Utc::now();
        let mut entries = self.entries.write().await;

        let mut seen: Vec<String> = Vec::with_capacity(server_tasks.len());
        for task in server_tasks {
            seen.push(task.id.clone());
            self.merge_entry(&mut entries, task, now);
        }

        let stale: Vec<String> = entries
            .values()
            .filter(|task| {
                !seen.contains(&task.id)
                    && task.is_terminal()
                    && now.signed_duration_since(task.updated_at) > self.retention
            })
            .map(|task| task.id.clone())
            .collect();
        for task_id in stale {
            entries.remove(&task_id);
            let _ = self.events.publish(Event::TaskRemoved { task_id });
        }

        let _ = self.events.publish(Event::TasksReconciled {
            task_count: entries.len(),
        });
    }

    /// Explicitly delete a task. Returns whether it existed.
    pub async fn remove(&self, task_id: &str) -> bool {
        let mut entries = self.entries.write().await;
        let removed = entries.remove(task_id).is_some();
        if removed {
            let _ = self.events.publish(Event::TaskRemoved {
                task_id: task_id.to_string(),
            });
        }
        removed
    }

    /// Delete every terminal task, returning how many were dropped.
    pub async fn clear_terminal(&self) -> usize {
        let mut entries = self.entries.write().await;
        let finished: Vec<String> = entries
            .values()
            .filter(|task| task.is_terminal())
            .map(|task| task.id.clone())
            .collect();
        for task_id in &finished {
            entries.remove(task_id);
            let _ = self.events.publish(Event::TaskRemoved {
                task_id: task_id.clone(),
            });
        }
        finished.len()
    }

    /// Fetch a task snapshot by id.
    pub async fn get(&self, task_id: &str) -> Option<DownloadTask> {
        self.entries.read().await.get(task_id).cloned()
    }

    /// All tasks, oldest first; ties break on id for a stable order.
    pub async fn list(&self) -> Vec<DownloadTask> {
        let mut tasks: Vec<DownloadTask> = {
            let entries = self.entries.read().await;
            entries.values().cloned().collect()
        };
        tasks.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        tasks
    }

    /// Tasks currently in the given status.
    pub async fn list_by_status(&self, status: TaskStatus) -> Vec<DownloadTask> {
        let mut tasks = self.list().await;
        tasks.retain(|task| task.status == status);
        tasks
    }

    /// Tasks belonging to the given platform.
    pub async fn list_by_platform(&self, platform: &str) -> Vec<DownloadTask> {
        let mut tasks = self.list().await;
        tasks.retain(|task| task.platform == platform);
        tasks
    }

    /// Tasks with the given file type.
    pub async fn list_by_file_type(&self, file_type: FileType) -> Vec<DownloadTask> {
        let mut tasks = self.list().await;
        tasks.retain(|task| task.file_type == file_type);
        tasks
    }

    /// Number of non-terminal tasks.
    pub async fn active_count(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|task| !task.is_terminal())
            .count()
    }

    /// Total number of tasks tracked.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no tasks.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn merge_entry(
        &self,
        entries: &mut HashMap<String, DownloadTask>,
        mut incoming: DownloadTask,
        now: DateTime<Utc>,
    ) {
        incoming.progress = clamp_progress(incoming.progress);
        let event = match entries.get_mut(&incoming.id) {
            Some(existing) => {
                let changed = existing.status != incoming.status
                    || (existing.progress - incoming.progress).abs() > f64::EPSILON;
                existing.url = incoming.url;
                existing.filename = incoming.filename;
                existing.file_type = incoming.file_type;
                existing.platform = incoming.platform;
                existing.status = incoming.status;
                existing.progress = incoming.progress;
                if incoming.speed.is_some() {
                    existing.speed = incoming.speed;
                }
                if incoming.size.is_some() {
                    existing.size = incoming.size;
                }
                if incoming.downloaded.is_some() {
                    existing.downloaded = incoming.downloaded;
                }
                if incoming.estimated_time.is_some() {
                    existing.estimated_time = incoming.estimated_time;
                }
                // Failure details follow the status: they persist while the
                // task stays failed and clear once the backend reports a
                // non-failed state.
                if incoming.status == TaskStatus::Failed {
                    if incoming.error_details.is_some() {
                        existing.error_details = incoming.error_details;
                    }
                } else {
                    existing.error_details = incoming.error_details;
                }
                existing.updated_at = advance(existing.updated_at, now);
                changed.then(|| Event::TaskUpserted {
                    task_id: existing.id.clone(),
                    status: existing.status,
                    progress: existing.progress,
                })
            }
            None => {
                incoming.updated_at = advance(incoming.updated_at, now);
                let event = Event::TaskUpserted {
                    task_id: incoming.id.clone(),
                    status: incoming.status,
                    progress: incoming.progress,
                };
                entries.insert(incoming.id.clone(), incoming);
                Some(event)
            }
        };

        if let Some(event) = event {
            let _ = self.events.publish(event);
        }
    }
}

fn advance(current: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > current { now } else { current }
}

#[cfg(test)]
mod tests {
    use super::*;
    use downpour_test_support::fixtures::{sample_task, task_with_progress};

    fn store() -> TaskStore {
        TaskStore::new(EventBus::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn upsert_merges_fields_in_call_order() {
        let store = store();
        let mut first = sample_task("t1", TaskStatus::Downloading);
        first.speed = Some("2 MB/s".into());
        store.upsert(first).await;

        let mut second = task_with_progress("t1", TaskStatus::Downloading, 75.0);
        second.speed = None;
        second.size = None;
        store.upsert(second).await;

        let merged = store.get("t1").await.expect("task should exist");
        assert!((merged.progress - 75.0).abs() < f64::EPSILON);
        // Sparse update preserved the richer display fields.
        assert_eq!(merged.speed.as_deref(), Some("2 MB/s"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn upsert_same_snapshot_is_idempotent() {
        let store = store();
        let task = sample_task("t1", TaskStatus::Pending);
        store.upsert(task.clone()).await;
        let once = store.get("t1").await.expect("task should exist");

        store.upsert(task).await;
        let twice = store.get("t1").await.expect("task should exist");
        assert_eq!(once.status, twice.status);
        assert!((once.progress - twice.progress).abs() < f64::EPSILON);
        assert!(twice.updated_at >= once.updated_at);
    }

    #[tokio::test]
    async fn progress_from_backend_is_clamped() {
        let store = store();
        store
            .upsert(task_with_progress("t1", TaskStatus::Downloading, 130.0))
            .await;
        let task = store.get("t1").await.expect("task should exist");
        assert!((task.progress - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn apply_status_on_unknown_id_is_noop() {
        let store = store();
        store.apply_status("ghost", TaskStatus::Paused).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn reconcile_lets_the_server_win() {
        let store = store();
        store.upsert(sample_task("t1", TaskStatus::Downloading)).await;
        store.apply_status("t1", TaskStatus::Paused).await;

        // A poll response issued before the pause reports the old state;
        // last write wins, optimistic transition included.
        store
            .reconcile(vec![task_with_progress(
                "t1",
                TaskStatus::Downloading,
                42.0,
            )])
            .await;

        let task = store.get("t1").await.expect("task should exist");
        assert_eq!(task.status, TaskStatus::Downloading);
        assert!((task.progress - 42.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn reconcile_advances_updated_at() {
        let store = store();
        store.upsert(sample_task("t1", TaskStatus::Pending)).await;
        let before = store.get("t1").await.expect("task should exist").updated_at;

        store
            .reconcile(vec![task_with_progress(
                "t1",
                TaskStatus::Downloading,
                42.0,
            )])
            .await;
        let after = store.get("t1").await.expect("task should exist").updated_at;
        assert!(after >= before);
    }

    #[tokio::test]
    async fn empty_snapshot_keeps_non_terminal_tasks() {
        let store = store();
        store.upsert(sample_task("t1", TaskStatus::Downloading)).await;
        store.upsert(sample_task("t2", TaskStatus::Pending)).await;

        store.reconcile(Vec::new()).await;

        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn absent_terminal_tasks_expire_after_retention() {
        let store = TaskStore::new(EventBus::new(), Duration::from_millis(1));
        store.upsert(sample_task("done", TaskStatus::Completed)).await;
        store.upsert(sample_task("live", TaskStatus::Downloading)).await;

        // Let the terminal entry age past the retention window.
        std::thread::sleep(Duration::from_millis(10));
        store.reconcile(Vec::new()).await;

        assert!(store.get("done").await.is_none());
        assert!(store.get("live").await.is_some());
    }

    #[tokio::test]
    async fn absent_terminal_tasks_survive_within_retention() {
        let store = store();
        store.upsert(sample_task("done", TaskStatus::Completed)).await;

        store.reconcile(Vec::new()).await;

        assert!(store.get("done").await.is_some());
    }

    #[tokio::test]
    async fn clear_terminal_drops_only_finished_tasks() {
        let store = store();
        store.upsert(sample_task("a", TaskStatus::Completed)).await;
        store.upsert(sample_task("b", TaskStatus::Failed)).await;
        store.upsert(sample_task("c", TaskStatus::Downloading)).await;

        assert_eq!(store.clear_terminal().await, 2);
        assert_eq!(store.len().await, 1);
        assert!(store.get("c").await.is_some());
    }

    #[tokio::test]
    async fn listings_filter_and_sort() {
        let store = store();
        let mut older = sample_task("b", TaskStatus::Downloading);
        older.created_at = Utc::now() - chrono::Duration::seconds(60);
        store.upsert(older).await;
        store.upsert(sample_task("a", TaskStatus::Completed)).await;

        let all = store.list().await;
        assert_eq!(all[0].id, "b");

        let downloading = store.list_by_status(TaskStatus::Downloading).await;
        assert_eq!(downloading.len(), 1);
        assert_eq!(store.active_count().await, 1);

        assert_eq!(store.list_by_platform("example").await.len(), 2);
        assert!(store.list_by_platform("elsewhere").await.is_empty());
        assert_eq!(
            store.list_by_file_type(FileType::Video).await.len(),
            2
        );
        assert!(store.list_by_file_type(FileType::Archive).await.is_empty());
    }

    #[tokio::test]
    async fn store_notifies_subscribers_of_changes() {
        let events = EventBus::new();
        let mut stream = events.subscribe(None);
        let store = TaskStore::new(events, Duration::from_secs(5));

        store.upsert(sample_task("t1", TaskStatus::Pending)).await;
        let envelope = stream.next().await.expect("expected upsert event");
        assert_eq!(envelope.event.kind(), "task_upserted");

        store.remove("t1").await;
        let envelope = stream.next().await.expect("expected removal event");
        assert_eq!(envelope.event.kind(), "task_removed");
    }
}
