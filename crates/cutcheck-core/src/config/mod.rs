//! Configuration management for cutcheck.
//!
//! Configuration is loaded from the platform config directory with defaults
//! for every field, so an empty or missing file is a valid configuration.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use crate::types::SubmissionSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Submission profiles
    pub submission: SubmissionConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Pixel classification settings
    pub pixels: PixelsConfig,

    /// Report settings
    pub report: ReportConfig,

    /// Preview settings
    pub preview: PreviewConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path (with ~ expansion).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.to_string_lossy();
        let expanded = PathBuf::from(shellexpand::tilde(&path_str).into_owned());
        let content = std::fs::read_to_string(&expanded)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.cutcheck.cutcheck/config.toml
    /// - Linux: ~/.config/cutcheck/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\cutcheck\config\config.toml
    ///
    /// Falls back to ~/.cutcheck/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "cutcheck", "cutcheck")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".cutcheck").join("config.toml")
            })
    }

    /// The submission profile every check runs against.
    pub fn active_spec(&self) -> Result<&SubmissionSpec, ConfigError> {
        self.submission.active_profile().ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "unknown submission profile '{}'",
                self.submission.active
            ))
        })
    }

    /// Switch the active submission profile.
    pub fn select_profile(&mut self, id: &str) -> Result<(), ConfigError> {
        if self.submission.profile(id).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "unknown submission profile '{id}'"
            )));
        }
        self.submission.active = id.to_string();
        Ok(())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.submission.active, "MBF_SPACE1");
        assert_eq!(config.limits.max_file_size_bytes, 52_428_800);
        assert_eq!(config.limits.layered_decode_timeout_ms, 10_000);
        assert_eq!(config.limits.max_alloc_bytes, 536_870_912);
        assert_eq!(config.pixels.tolerance, 0);
        assert_eq!(config.report.size_decimals, 2);
    }

    #[test]
    fn test_default_active_spec() {
        let config = Config::default();
        let spec = config.active_spec().unwrap();
        assert_eq!((spec.width, spec.height), (1654, 1182));
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[submission]"));
        assert!(toml.contains("[limits]"));
        assert!(toml.contains("MBF_SPACE2"));
    }

    #[test]
    fn test_toml_round_trip_keeps_profiles() {
        let toml = Config::default().to_toml().unwrap();
        let parsed = Config::from_toml(&toml).unwrap();
        assert_eq!(parsed.submission.profiles.len(), 2);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml("[pixels]\ntolerance = 2\n").unwrap();
        assert_eq!(config.pixels.tolerance, 2);
        assert_eq!(config.submission.active, "MBF_SPACE1");
    }

    #[test]
    fn test_select_profile() {
        let mut config = Config::default();
        config.select_profile("MBF_SPACE2").unwrap();
        assert_eq!(config.active_spec().unwrap().width, 3425);
        assert!(config.select_profile("MBF_SPACE9").is_err());
        assert_eq!(config.submission.active, "MBF_SPACE2");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[submission]\nactive = \"A4\"\n\n[[submission.profiles]]\nid = \"A4\"\nwidth = 2480\nheight = 3508\n",
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.active_spec().unwrap().height, 3508);
    }
}
