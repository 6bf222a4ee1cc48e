//! Scheduler configuration.
//!
//! Intervals can be read from a TOML file and overridden from environment
//! variables. Values are whole seconds.
//!
//! ```toml
//! [intervals]
//! global_secs = 10
//! recipient_secs = 60
//! recipient_broadcast_secs = 86400
//! ```

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SchedulerError};

/// Default minimum spacing between any two sends.
pub const DEFAULT_GLOBAL_INTERVAL_SECS: u64 = 10;
/// Default minimum spacing between two sends to the same recipient.
pub const DEFAULT_RECIPIENT_INTERVAL_SECS: u64 = 60;
/// Default minimum spacing between two broadcasts to the same recipient.
pub const DEFAULT_RECIPIENT_BROADCAST_INTERVAL_SECS: u64 = 24 * 60 * 60;

pub const ENV_GLOBAL_INTERVAL: &str = "ANTIBAN_GLOBAL_INTERVAL_SECS";
pub const ENV_RECIPIENT_INTERVAL: &str = "ANTIBAN_RECIPIENT_INTERVAL_SECS";
pub const ENV_RECIPIENT_BROADCAST_INTERVAL: &str = "ANTIBAN_RECIPIENT_BROADCAST_INTERVAL_SECS";

/// The three spacing rules enforced by a scheduling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Minimum gap between any two sends
    pub global_interval: TimeDelta,
    /// Minimum gap between two sends to the same recipient
    pub recipient_interval: TimeDelta,
    /// Minimum gap between two broadcast-class sends to the same recipient
    pub recipient_broadcast_interval: TimeDelta,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        IntervalSettings::default().into()
    }
}

/// Configuration file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub intervals: IntervalSettings,
}

/// Interval settings in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSettings {
    #[serde(default = "default_global_secs")]
    pub global_secs: u64,
    #[serde(default = "default_recipient_secs")]
    pub recipient_secs: u64,
    #[serde(default = "default_recipient_broadcast_secs")]
    pub recipient_broadcast_secs: u64,
}

fn default_global_secs() -> u64 {
    DEFAULT_GLOBAL_INTERVAL_SECS
}

fn default_recipient_secs() -> u64 {
    DEFAULT_RECIPIENT_INTERVAL_SECS
}

fn default_recipient_broadcast_secs() -> u64 {
    DEFAULT_RECIPIENT_BROADCAST_INTERVAL_SECS
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            global_secs: default_global_secs(),
            recipient_secs: default_recipient_secs(),
            recipient_broadcast_secs: default_recipient_broadcast_secs(),
        }
    }
}

impl From<IntervalSettings> for SchedulerConfig {
    fn from(s: IntervalSettings) -> Self {
        Self {
            global_interval: secs(s.global_secs),
            recipient_interval: secs(s.recipient_secs),
            recipient_broadcast_interval: secs(s.recipient_broadcast_secs),
        }
    }
}

/// Whole seconds, truncated.
impl From<SchedulerConfig> for IntervalSettings {
    fn from(c: SchedulerConfig) -> Self {
        Self {
            global_secs: c.global_interval.num_seconds().max(0) as u64,
            recipient_secs: c.recipient_interval.num_seconds().max(0) as u64,
            recipient_broadcast_secs: c.recipient_broadcast_interval.num_seconds().max(0) as u64,
        }
    }
}

// Values too large for a TimeDelta clamp to its maximum.
fn secs(value: u64) -> TimeDelta {
    let value = i64::try_from(value).unwrap_or(i64::MAX);
    TimeDelta::try_seconds(value).unwrap_or(TimeDelta::MAX)
}

impl SchedulerConfig {
    /// Build a configuration from whole-second intervals.
    pub fn from_secs(global: u64, recipient: u64, recipient_broadcast: u64) -> Self {
        IntervalSettings {
            global_secs: global,
            recipient_secs: recipient,
            recipient_broadcast_secs: recipient_broadcast,
        }
        .into()
    }

    /// Load configuration from a TOML file.
    ///
    /// Keys missing from the file keep their defaults. The result is validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SchedulerError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| {
            SchedulerError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        let config: Self = file.intervals.into();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `antiban.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self> {
        let search_paths = [
            PathBuf::from("antiban.toml"),
            PathBuf::from("backend/antiban.toml"),
            PathBuf::from("../antiban.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading scheduler config from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(SchedulerError::configuration(
            "No antiban.toml found in standard locations",
        ))
    }

    /// Apply interval overrides from environment variables.
    ///
    /// # Environment Variables
    /// - `ANTIBAN_GLOBAL_INTERVAL_SECS`
    /// - `ANTIBAN_RECIPIENT_INTERVAL_SECS`
    /// - `ANTIBAN_RECIPIENT_BROADCAST_INTERVAL_SECS`
    ///
    /// # Errors
    /// Returns an error if a variable is set but is not a whole number of
    /// seconds, or if the resulting configuration is invalid.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_secs_overrides(
            env_secs(ENV_GLOBAL_INTERVAL)?,
            env_secs(ENV_RECIPIENT_INTERVAL)?,
            env_secs(ENV_RECIPIENT_BROADCAST_INTERVAL)?,
        )
    }

    /// Replace the intervals given in whole seconds and validate the result.
    ///
    /// Intervals passed as `None` are kept exactly, sub-second precision
    /// included.
    pub fn with_secs_overrides(
        self,
        global: Option<u64>,
        recipient: Option<u64>,
        recipient_broadcast: Option<u64>,
    ) -> Result<Self> {
        let config = Self {
            global_interval: global.map_or(self.global_interval, secs),
            recipient_interval: recipient.map_or(self.recipient_interval, secs),
            recipient_broadcast_interval: recipient_broadcast
                .map_or(self.recipient_broadcast_interval, secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Every interval must be strictly positive.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("global_interval", self.global_interval),
            ("recipient_interval", self.recipient_interval),
            ("recipient_broadcast_interval", self.recipient_broadcast_interval),
        ];
        for (name, interval) in checks {
            if interval <= TimeDelta::zero() {
                return Err(SchedulerError::configuration(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }
        Ok(())
    }
}

fn env_secs(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            SchedulerError::configuration(format!(
                "{} must be a whole number of seconds, got '{}'",
                key, raw
            ))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.global_interval, TimeDelta::seconds(10));
        assert_eq!(config.recipient_interval, TimeDelta::minutes(1));
        assert_eq!(config.recipient_broadcast_interval, TimeDelta::hours(24));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[intervals]
global_secs = 5
recipient_secs = 30
recipient_broadcast_secs = 3600
"#;
        let config = SchedulerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config, SchedulerConfig::from_secs(5, 30, 3600));
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let toml = r#"
[intervals]
recipient_secs = 120
"#;
        let config = SchedulerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.global_interval, TimeDelta::seconds(10));
        assert_eq!(config.recipient_interval, TimeDelta::seconds(120));
        assert_eq!(config.recipient_broadcast_interval, TimeDelta::hours(24));
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = SchedulerConfig::from_toml_str("").unwrap();
        assert_eq!(config, SchedulerConfig::default());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let toml = r#"
[intervals]
global_secs = 0
"#;
        let err = SchedulerConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("global_interval"));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = SchedulerConfig::from_toml_str("[intervals\nglobal_secs = ");
        assert!(matches!(result, Err(SchedulerError::Configuration(_))));
    }

    #[test]
    fn test_overrides_keep_sub_second_intervals() {
        let config = SchedulerConfig {
            global_interval: TimeDelta::milliseconds(500),
            recipient_interval: TimeDelta::milliseconds(1500),
            recipient_broadcast_interval: TimeDelta::hours(1),
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.with_secs_overrides(None, None, None).unwrap(), config);

        let overridden = config.with_secs_overrides(None, Some(2), None).unwrap();
        assert_eq!(overridden.global_interval, TimeDelta::milliseconds(500));
        assert_eq!(overridden.recipient_interval, TimeDelta::seconds(2));
        assert_eq!(overridden.recipient_broadcast_interval, TimeDelta::hours(1));
    }

    #[test]
    fn test_settings_roundtrip_through_config() {
        let settings = IntervalSettings {
            global_secs: 7,
            recipient_secs: 70,
            recipient_broadcast_secs: 700,
        };
        let config: SchedulerConfig = settings.into();
        assert_eq!(IntervalSettings::from(config), settings);
    }
}
