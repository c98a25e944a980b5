//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

use crate::types::SubmissionSpec;

/// Submission profiles and the profile active for this session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Id of the profile every check runs against
    pub active: String,

    /// Known size profiles
    pub profiles: Vec<SubmissionSpec>,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            active: "MBF_SPACE1".to_string(),
            profiles: vec![
                SubmissionSpec::new("MBF_SPACE1", 1654, 1182),
                SubmissionSpec::new("MBF_SPACE2", 3425, 1182),
            ],
        }
    }
}

impl SubmissionConfig {
    /// Look up a profile by id.
    pub fn profile(&self, id: &str) -> Option<&SubmissionSpec> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// The active profile, if its id is known.
    pub fn active_profile(&self) -> Option<&SubmissionSpec> {
        self.profile(&self.active)
    }
}

/// Resource limits applied while checking a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Files above this size are flagged in the report (not blocked)
    pub max_file_size_bytes: u64,

    /// Deadline for the layered-document decoder in milliseconds
    pub layered_decode_timeout_ms: u64,

    /// Largest width or height the layered reader will allocate for
    pub max_image_dimension: u32,

    /// Upper bound on decode buffers for a single file, in bytes
    pub max_alloc_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 52_428_800,
            layered_decode_timeout_ms: 10_000,
            // largest dimension a version 1 layered document can declare
            max_image_dimension: 30_000,
            max_alloc_bytes: 512 * 1024 * 1024,
        }
    }
}

/// Pixel classification settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelsConfig {
    /// Maximum channel difference for a pixel to still count as mono.
    /// Differences of about 2 are indistinguishable in print.
    pub tolerance: u8,
}

/// Report presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Decimal places in human-readable file sizes
    pub size_decimals: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { size_decimals: 2 }
    }
}

/// Preview rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Whether to attach a preview to reports
    pub enabled: bool,

    /// Preview size in pixels (longest edge)
    pub size: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 512,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
