//! Range checks applied to a profile before the core starts.

use crate::error::{ProfileError, ProfileResult};
use crate::model::AppProfile;

const POLL_INTERVAL_MAX_SECS: u64 = 3_600;
const PAGE_SIZE_MAX: u32 = 100;
const PLATFORM_MAX_CHARS: usize = 50;

/// Reject out-of-range profile values.
///
/// # Errors
///
/// Returns [`ProfileError::InvalidField`] naming the first offending field.
pub fn validate_profile(profile: &AppProfile) -> ProfileResult<()> {
    if profile.poll_interval_secs == 0 || profile.poll_interval_secs > POLL_INTERVAL_MAX_SECS {
        return Err(ProfileError::InvalidField {
            field: "poll_interval_secs",
            value: Some(profile.poll_interval_secs.to_string()),
            reason: "must be between 1 and 3600",
        });
    }
    if profile.page_size == 0 || profile.page_size > PAGE_SIZE_MAX {
        return Err(ProfileError::InvalidField {
            field: "page_size",
            value: Some(profile.page_size.to_string()),
            reason: "must be between 1 and 100",
        });
    }
    let platform = profile.default_platform.trim();
    if platform.is_empty() || platform.chars().count() > PLATFORM_MAX_CHARS {
        return Err(ProfileError::InvalidField {
            field: "default_platform",
            value: Some(profile.default_platform.clone()),
            reason: "must be non-empty and at most 50 characters",
        });
    }
    if profile.log_level.trim().is_empty() {
        return Err(ProfileError::InvalidField {
            field: "log_level",
            value: None,
            reason: "must not be empty",
        });
    }
    if let Some(format) = profile.log_format.as_deref()
        && format != "json"
        && format != "pretty"
    {
        return Err(ProfileError::InvalidField {
            field: "log_format",
            value: Some(format.to_string()),
            reason: "must be \"json\" or \"pretty\"",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        assert!(validate_profile(&AppProfile::default()).is_ok());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let profile = AppProfile {
            poll_interval_secs: 0,
            ..AppProfile::default()
        };
        let err = validate_profile(&profile).expect_err("zero interval must fail");
        assert!(matches!(
            err,
            ProfileError::InvalidField {
                field: "poll_interval_secs",
                ..
            }
        ));
    }

    #[test]
    fn oversized_page_size_is_rejected() {
        let profile = AppProfile {
            page_size: 500,
            ..AppProfile::default()
        };
        assert!(validate_profile(&profile).is_err());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let profile = AppProfile {
            log_format: Some("xml".to_string()),
            ..AppProfile::default()
        };
        assert!(validate_profile(&profile).is_err());
        let profile = AppProfile {
            log_format: Some("pretty".to_string()),
            ..AppProfile::default()
        };
        assert!(validate_profile(&profile).is_ok());
    }
}
