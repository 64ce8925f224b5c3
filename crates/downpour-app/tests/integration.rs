//! End-to-end flows across the assembled core: gateway, stores, poller, and
//! the workflow façade, driven against the scriptable mock backend.

use std::sync::Arc;
use std::time::Duration;

use downpour_app::{AppCore, bootstrap};
use downpour_config::AppProfile;
use downpour_core::{DownloadReceipt, DownloadRequest, FileType};
use downpour_events::TaskStatus;
use downpour_test_support::assert::{assert_progress, assert_status};
use downpour_test_support::fixtures::{
    sample_page, sample_platform, sample_results, task_with_progress,
};
use downpour_test_support::mocks::MockBackend;

const POLL: Duration = Duration::from_secs(5);

struct Rig {
    backend: Arc<MockBackend>,
    core: AppCore,
}

fn rig() -> Rig {
    let backend = Arc::new(MockBackend::new());
    let core = bootstrap(AppProfile::default(), backend.clone()).expect("core should assemble");
    Rig { backend, core }
}

fn video_request(url: &str, filename: &str) -> DownloadRequest {
    DownloadRequest {
        url: url.into(),
        filename: filename.into(),
        file_type: FileType::Video,
        platform: "x".into(),
    }
}

#[test]
fn bootstrap_rejects_out_of_range_profiles() {
    let profile = AppProfile {
        poll_interval_secs: 0,
        ..AppProfile::default()
    };
    assert!(bootstrap(profile, Arc::new(MockBackend::new())).is_err());
}

#[tokio::test]
async fn accepted_download_lands_in_the_store_as_pending() {
    let rig = rig();
    rig.backend.enqueue_receipt(DownloadReceipt {
        task_id: "t1".into(),
        status: TaskStatus::Pending,
        message: None,
    });

    let task_id = rig
        .core
        .orchestrator
        .download(video_request("https://x/y", "a.mp4"))
        .await
        .expect("download should be accepted");
    assert_eq!(task_id, "t1");

    let task = rig.core.tasks.get("t1").await.expect("task should exist");
    assert_status(&task, TaskStatus::Pending);
    assert_progress(&task, 0.0);
}

#[tokio::test(start_paused = true)]
async fn poll_cycle_advances_progress_and_updated_at() {
    let rig = rig();
    rig.backend.enqueue_receipt(DownloadReceipt {
        task_id: "t1".into(),
        status: TaskStatus::Pending,
        message: None,
    });
    rig.core
        .orchestrator
        .download(video_request("https://x/y", "a.mp4"))
        .await
        .expect("download should be accepted");
    let before = rig.core.tasks.get("t1").await.expect("task should exist");

    rig.backend
        .enqueue_snapshot(vec![task_with_progress("t1", TaskStatus::Downloading, 42.0)]);
    let handle = rig.core.start_polling();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let task = rig.core.tasks.get("t1").await.expect("task should exist");
    assert_status(&task, TaskStatus::Downloading);
    assert_progress(&task, 42.0);
    assert!(task.updated_at >= before.updated_at);
    drop(handle);
}

#[tokio::test(start_paused = true)]
async fn late_poll_response_wins_over_optimistic_pause() {
    let rig = rig();
    rig.backend
        .enqueue_snapshot(vec![task_with_progress("t1", TaskStatus::Downloading, 30.0)]);
    let handle = rig.core.start_polling();
    tokio::time::sleep(Duration::from_millis(50)).await;

    rig.core
        .orchestrator
        .pause("t1")
        .await
        .expect("pause should be accepted");
    let task = rig.core.tasks.get("t1").await.expect("task should exist");
    assert_status(&task, TaskStatus::Paused);

    // The next poll serves a snapshot captured before the pause reached the
    // backend; last write wins, so the stale state shows until a fresher
    // poll corrects it.
    tokio::time::sleep(POLL + Duration::from_millis(50)).await;
    let task = rig.core.tasks.get("t1").await.expect("task should exist");
    assert_status(&task, TaskStatus::Downloading);
    drop(handle);
}

#[tokio::test]
async fn search_selection_batch_download_round_trip() {
    let rig = rig();
    rig.backend
        .enqueue_page(sample_page(sample_results(2), 2, 1, 10));
    rig.core
        .session
        .search("lo-fi beats", FileType::Video, "all")
        .await
        .expect("search should succeed");

    rig.core.session.select_all().await;
    let selected = rig.core.session.selected_results().await;
    assert_eq!(selected.len(), 2);

    let requests = selected
        .iter()
        .map(downpour_core::SearchResult::to_download_request)
        .collect();
    let outcomes = rig.core.orchestrator.batch(requests).await;
    assert!(outcomes.iter().all(downpour_core::BatchOutcome::succeeded));
    assert_eq!(rig.core.tasks.len().await, 2);
}

#[tokio::test]
async fn batch_collects_failures_without_aborting() {
    let rig = rig();
    rig.backend.fail_next("download", "disk full");

    let outcomes = rig
        .core
        .orchestrator
        .batch(vec![
            video_request("https://x/1", "one.mp4"),
            video_request("https://x/2", "two.mp4"),
        ])
        .await;

    assert_eq!(outcomes.len(), 2);
    assert!(!outcomes[0].succeeded());
    assert!(outcomes[1].succeeded());
    assert_eq!(rig.core.tasks.len().await, 1);
}

#[tokio::test]
async fn banner_holds_only_the_latest_user_failure() {
    let rig = rig();
    assert!(rig.core.banner.current().is_none());

    rig.backend.fail_next("download", "disk full");
    let _ = rig
        .core
        .orchestrator
        .download(video_request("https://x/y", "a.mp4"))
        .await;
    let first = rig.core.banner.current().expect("banner should be raised");
    assert!(first.contains("disk full"));

    rig.backend.fail_next("pause_download", "no such task");
    let _ = rig.core.orchestrator.pause("t9").await;
    let second = rig.core.banner.current().expect("banner should be raised");
    assert!(second.contains("no such task"));

    rig.core.banner.dismiss();
    assert!(rig.core.banner.current().is_none());
}

#[tokio::test(start_paused = true)]
async fn poll_failures_never_reach_the_banner() {
    let rig = rig();
    rig.backend.fail_next("list_tasks", "bridge down");

    let handle = rig.core.start_polling();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(rig.core.metrics.snapshot().poll_failures_total, 1);
    assert!(rig.core.banner.current().is_none());
    drop(handle);
}

#[tokio::test]
async fn cancel_is_optimistic_until_confirmed() {
    let rig = rig();
    rig.core
        .tasks
        .upsert(task_with_progress("t1", TaskStatus::Downloading, 10.0))
        .await;

    rig.core
        .orchestrator
        .cancel("t1")
        .await
        .expect("cancel should be accepted");
    let task = rig.core.tasks.get("t1").await.expect("task should exist");
    assert_status(&task, TaskStatus::Cancelled);
}

#[tokio::test]
async fn platform_directory_fetches_once_and_filters() {
    let rig = rig();
    let mut disabled = sample_platform("niche", vec![FileType::Document]);
    disabled.is_enabled = false;
    rig.backend.set_platforms(vec![
        sample_platform("yt", vec![FileType::Video, FileType::Audio]),
        sample_platform("sc", vec![FileType::Audio]),
        disabled,
    ]);

    let all = rig
        .core
        .platforms
        .all()
        .await
        .expect("directory should load");
    assert_eq!(all.len(), 3);

    let video = rig
        .core
        .platforms
        .by_file_type(FileType::Video)
        .await
        .expect("filtered lookup should succeed");
    assert_eq!(video.len(), 1);
    assert_eq!(video[0].id, "yt");

    // Second lookup is served from the cache.
    assert_eq!(rig.backend.call_count("list_platforms"), 1);
}

#[tokio::test]
async fn clear_finished_removes_terminal_tasks_only() {
    let rig = rig();
    rig.core
        .tasks
        .upsert(task_with_progress("done", TaskStatus::Completed, 100.0))
        .await;
    rig.core
        .tasks
        .upsert(task_with_progress("live", TaskStatus::Downloading, 20.0))
        .await;

    use downpour_core::DownloadWorkflow;
    let cleared = rig
        .core
        .orchestrator
        .clear_finished()
        .await
        .expect("clear should succeed");
    assert_eq!(cleared, 1);
    assert!(rig.core.tasks.get("done").await.is_none());
    assert!(rig.core.tasks.get("live").await.is_some());
}
