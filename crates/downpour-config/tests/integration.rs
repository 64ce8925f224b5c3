//! File-backed profile loading, end to end.

use std::io::Write;
use std::path::Path;

use downpour_config::{AppProfile, ProfileError, load_profile};
use tempfile::NamedTempFile;

fn write_profile(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file should be created");
    file.write_all(contents.as_bytes())
        .expect("temp file should be writable");
    file
}

#[test]
fn missing_path_yields_defaults() {
    let profile = load_profile(None).expect("defaults should load");
    assert_eq!(profile, AppProfile::default());
}

#[test]
fn yaml_file_overrides_defaults() {
    let file = write_profile(
        "poll_interval_secs: 15\npage_size: 25\ndefault_platform: youtube\nlog_format: json\n",
    );
    let profile = load_profile(Some(file.path())).expect("profile should load");
    assert_eq!(profile.poll_interval_secs, 15);
    assert_eq!(profile.page_size, 25);
    assert_eq!(profile.default_platform, "youtube");
    assert_eq!(profile.log_format.as_deref(), Some("json"));
}

#[test]
fn unknown_fields_are_rejected() {
    let file = write_profile("poll_interval_secs: 15\nretry_count: 9\n");
    let err = load_profile(Some(file.path())).expect_err("unknown field must fail");
    assert!(matches!(err, ProfileError::Parse { .. }));
}

#[test]
fn out_of_range_file_values_are_rejected() {
    let file = write_profile("page_size: 0\n");
    let err = load_profile(Some(file.path())).expect_err("zero page size must fail");
    assert!(matches!(
        err,
        ProfileError::InvalidField {
            field: "page_size",
            ..
        }
    ));
}

#[test]
fn unreadable_path_reports_io_error() {
    let err = load_profile(Some(Path::new("/definitely/missing/profile.yaml")))
        .expect_err("missing file must fail");
    assert!(matches!(err, ProfileError::Io { .. }));
}
