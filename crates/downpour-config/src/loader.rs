//! Layered profile loading: defaults, then file, then environment.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ProfileError, ProfileResult};
use crate::model::AppProfile;
use crate::validate::validate_profile;

const ENV_POLL_INTERVAL: &str = "DOWNPOUR_POLL_INTERVAL_SECS";
const ENV_PAGE_SIZE: &str = "DOWNPOUR_PAGE_SIZE";
const ENV_PLATFORM: &str = "DOWNPOUR_PLATFORM";
const ENV_LOG_LEVEL: &str = "DOWNPOUR_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "DOWNPOUR_LOG_FORMAT";

/// Load the profile, layering an optional YAML file and environment
/// overrides on top of the defaults, then validating the result.
///
/// # Errors
///
/// Returns [`ProfileError`] when the file cannot be read or parsed, an
/// override cannot be interpreted, or the final profile is out of range.
pub fn load_profile(path: Option<&Path>) -> ProfileResult<AppProfile> {
    let mut profile = match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|source| ProfileError::Io {
                operation: "profile.read",
                source,
            })?;
            serde_yaml::from_str(&raw).map_err(|source| ProfileError::Parse { source })?
        }
        None => AppProfile::default(),
    };
    profile = apply_env_overrides(profile)?;
    validate_profile(&profile)?;
    debug!(
        poll_interval_secs = profile.poll_interval_secs,
        page_size = profile.page_size,
        "profile loaded"
    );
    Ok(profile)
}

/// Apply `DOWNPOUR_*` environment overrides to a profile.
///
/// # Errors
///
/// Returns [`ProfileError::InvalidField`] when an override cannot be parsed.
pub fn apply_env_overrides(profile: AppProfile) -> ProfileResult<AppProfile> {
    apply_overrides_from(profile, std::env::vars())
}

fn apply_overrides_from(
    mut profile: AppProfile,
    vars: impl Iterator<Item = (String, String)>,
) -> ProfileResult<AppProfile> {
    for (name, value) in vars {
        match name.as_str() {
            ENV_POLL_INTERVAL => {
                profile.poll_interval_secs =
                    value.parse().map_err(|_| ProfileError::InvalidField {
                        field: "poll_interval_secs",
                        value: Some(value),
                        reason: "environment override is not an integer",
                    })?;
            }
            ENV_PAGE_SIZE => {
                profile.page_size = value.parse().map_err(|_| ProfileError::InvalidField {
                    field: "page_size",
                    value: Some(value),
                    reason: "environment override is not an integer",
                })?;
            }
            ENV_PLATFORM => profile.default_platform = value,
            ENV_LOG_LEVEL => profile.log_level = value,
            ENV_LOG_FORMAT => profile.log_format = Some(value),
            _ => {}
        }
    }
    Ok(profile)
}
