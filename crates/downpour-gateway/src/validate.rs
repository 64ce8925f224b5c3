//! Input rules applied before any backend call is dispatched.

use downpour_core::{DownloadRequest, SearchRequest};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

const QUERY_MIN_CHARS: usize = 2;
const QUERY_MAX_CHARS: usize = 200;
const PLATFORM_MAX_CHARS: usize = 50;
const PAGE_SIZE_MAX: u32 = 100;

static ILLEGAL_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("filename pattern must compile"));

static RESERVED_DEVICE_NAMES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(CON|PRN|AUX|NUL|COM[1-9]|LPT[1-9])$")
        .expect("device name pattern must compile")
});

/// Collect the rules a search request violates. Empty means valid.
pub(crate) fn search_request(request: &SearchRequest) -> Vec<String> {
    let mut violations = query(&request.query);
    violations.extend(platform(&request.platform));
    violations.extend(pagination(request.page, request.page_size));
    violations
}

/// Collect the rules a download request violates. Empty means valid.
pub(crate) fn download_request(request: &DownloadRequest) -> Vec<String> {
    let mut violations = Vec::new();
    if Url::parse(&request.url).is_err() {
        violations.push("url is not syntactically valid".to_string());
    }
    violations.extend(filename(&request.filename));
    violations.extend(platform(&request.platform));
    violations
}

/// Collect the rules a suggestion lookup violates. Empty means valid.
pub(crate) fn suggestion_request(raw_query: &str, raw_platform: &str) -> Vec<String> {
    let mut violations = Vec::new();
    if raw_query.trim().is_empty() {
        violations.push("query must not be empty".to_string());
    }
    violations.extend(platform(raw_platform));
    violations
}

/// Collect the rules a task identifier violates. Empty means valid.
pub(crate) fn task_id(id: &str) -> Vec<String> {
    if id.trim().is_empty() {
        vec!["task id must not be empty".to_string()]
    } else {
        Vec::new()
    }
}

fn query(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let mut violations = Vec::new();
    if trimmed.is_empty() {
        violations.push("query must not be empty".to_string());
        return violations;
    }
    if trimmed.chars().count() < QUERY_MIN_CHARS {
        violations.push(format!("query needs at least {QUERY_MIN_CHARS} characters"));
    }
    if trimmed.chars().count() > QUERY_MAX_CHARS {
        violations.push(format!("query must not exceed {QUERY_MAX_CHARS} characters"));
    }
    violations
}

fn platform(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let mut violations = Vec::new();
    if trimmed.is_empty() {
        violations.push("platform must not be empty".to_string());
    }
    if trimmed.chars().count() > PLATFORM_MAX_CHARS {
        violations.push(format!(
            "platform must not exceed {PLATFORM_MAX_CHARS} characters"
        ));
    }
    violations
}

fn pagination(page: u32, page_size: u32) -> Vec<String> {
    let mut violations = Vec::new();
    if page < 1 {
        violations.push("page must be at least 1".to_string());
    }
    if page_size < 1 || page_size > PAGE_SIZE_MAX {
        violations.push(format!("page size must be between 1 and {PAGE_SIZE_MAX}"));
    }
    violations
}

fn filename(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let mut violations = Vec::new();
    if trimmed.is_empty() {
        violations.push("filename must not be empty".to_string());
        return violations;
    }
    if ILLEGAL_FILENAME_CHARS.is_match(trimmed) {
        violations.push("filename contains illegal characters".to_string());
    }
    let stem = trimmed.split('.').next().unwrap_or(trimmed);
    if RESERVED_DEVICE_NAMES.is_match(stem) {
        violations.push("filename is a reserved device name".to_string());
    }
    violations
}
