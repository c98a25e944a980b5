//! Configuration validation with range checks.

use std::collections::HashSet;

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.submission.profiles.is_empty() {
            return Err(ConfigError::ValidationError(
                "submission.profiles must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for profile in &self.submission.profiles {
            if !seen.insert(profile.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "submission.profiles contains duplicate id '{}'",
                    profile.id
                )));
            }
            if profile.width == 0 || profile.height == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "submission profile '{}' must have non-zero width and height",
                    profile.id
                )));
            }
        }
        if self.submission.active_profile().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "submission.active '{}' does not name a profile",
                self.submission.active
            )));
        }
        if self.limits.max_file_size_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_bytes must be > 0".into(),
            ));
        }
        if self.limits.layered_decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.layered_decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.max_alloc_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_alloc_bytes must be > 0".into(),
            ));
        }
        if self.preview.size == 0 {
            return Err(ConfigError::ValidationError(
                "preview.size must be > 0".into(),
            ));
        }
        Ok(())
    }
}
