//! TOML-based application configuration.
//!
//! Stores the polling tunables (refresh interval, validation weekday,
//! optional fixed period start), notification preferences, and the remote
//! base URLs. Configuration is read once per process lifetime from
//! `~/.config/clockwatch/config.toml`, then environment overrides are
//! applied on top:
//!
//! - `REFRESH_INTERVAL_SECONDS` -- poll interval in seconds
//! - `VALIDATION_DAY` -- weekday index, 0 = Sunday
//! - `CUSTOM_START_DATE` -- ISO date overriding the computed period start
//!
//! Loading fails soft: missing or unparseable values are logged and the
//! defaults retained. Nothing here surfaces an error to the poller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Polling tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between scheduler ticks.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    /// Weekday on which automatic polling is permitted (0 = Sunday).
    #[serde(default = "default_validation_day")]
    pub validation_day: u8,
    /// Fixed reporting-period start; overrides the computed Sunday when set.
    #[serde(default)]
    pub custom_start_date: Option<NaiveDate>,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Remote endpoint bases. Overridable mainly for tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Identity endpoint base (`{base}/user`).
    #[serde(default = "default_api_base")]
    pub base_url: String,
    /// Approval endpoint base (`{base}/workspaces/...`).
    #[serde(default = "default_app_base")]
    pub app_base_url: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/clockwatch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

fn default_interval_seconds() -> u64 {
    360
}
fn default_validation_day() -> u8 {
    1 // Monday
}
fn default_true() -> bool {
    true
}
fn default_api_base() -> String {
    "https://api.clockify.me/api/v1".into()
}
fn default_app_base() -> String {
    "https://app.clockify.me/api".into()
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            validation_day: default_validation_day(),
            custom_start_date: None,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            app_base_url: default_app_base(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            polling: PollingConfig::default(),
            notifications: NotificationsConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

/// Returns `~/.config/clockwatch[-dev]/` based on CLOCKWATCH_ENV.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CLOCKWATCH_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("clockwatch-dev")
    } else {
        base_dir.join("clockwatch")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, apply environment overrides, and log the effective
    /// values. A missing file is replaced with defaults; a present but
    /// unparseable file is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        let mut cfg = match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                cfg
            }
        };
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        cfg.sanitize();
        cfg.log_effective();
        Ok(cfg)
    }

    /// Load from disk, returning sanitized defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("config load failed, using defaults: {e}");
            let mut cfg = Self::default();
            cfg.apply_env_overrides(|key| std::env::var(key).ok());
            cfg.sanitize();
            cfg
        })
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Apply environment overrides through an injectable lookup.
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("REFRESH_INTERVAL_SECONDS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => self.polling.interval_seconds = secs,
                _ => tracing::warn!("ignoring invalid REFRESH_INTERVAL_SECONDS: {raw:?}"),
            }
        }
        if let Some(raw) = lookup("VALIDATION_DAY") {
            match raw.parse::<u8>() {
                Ok(day) if day <= 6 => self.polling.validation_day = day,
                _ => tracing::warn!("ignoring invalid VALIDATION_DAY: {raw:?}"),
            }
        }
        if let Some(raw) = lookup("CUSTOM_START_DATE") {
            match raw.parse::<NaiveDate>() {
                Ok(date) => self.polling.custom_start_date = Some(date),
                Err(_) => tracing::warn!("ignoring invalid CUSTOM_START_DATE: {raw:?}"),
            }
        }
    }

    /// Clamp out-of-range file values back to defaults.
    pub fn sanitize(&mut self) {
        if self.polling.interval_seconds == 0 {
            tracing::warn!("polling.interval_seconds must be positive, using default");
            self.polling.interval_seconds = default_interval_seconds();
        }
        if self.polling.validation_day > 6 {
            tracing::warn!(
                "polling.validation_day {} out of range, using default",
                self.polling.validation_day
            );
            self.polling.validation_day = default_validation_day();
        }
    }

    fn log_effective(&self) {
        tracing::info!(
            interval_seconds = self.polling.interval_seconds,
            validation_day = %DAY_NAMES[self.polling.validation_day as usize],
            custom_start_date = ?self.polling.custom_start_date,
            "effective configuration"
        );
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::json_value_at(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.sanitize();
        self.save()
    }

    fn json_value_at<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((p, l)) => (Some(p), l),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = &mut *root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|e| invalid(e.to_string()))?
                    .into(),
            ),
            // Optional fields serialize as null; "none" clears them again.
            serde_json::Value::Null | serde_json::Value::String(_) => {
                if value.eq_ignore_ascii_case("none") {
                    serde_json::Value::Null
                } else {
                    serde_json::Value::String(value.to_string())
                }
            }
            _ => return Err(invalid("unsupported value type".into())),
        };
        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }
}
