//! TOML-based application configuration.
//!
//! Stores user preferences for the hold-to-complete gesture. Configuration
//! lives next to the snapshot at `~/.config/habitdeck/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{CoreError, Result};

/// Hold-to-complete gesture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldConfig {
    /// Sustained-hold duration before a habit counts as completed.
    #[serde(default = "default_hold_secs")]
    pub duration_secs: u64,
    /// Show a celebration message when a hold completes.
    #[serde(default = "default_true")]
    pub celebration: bool,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hold: HoldConfig,
}

// Default functions
fn default_hold_secs() -> u64 {
    3
}
fn default_true() -> bool {
    true
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_hold_secs(),
            celebration: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hold: HoldConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(CoreError::Custom("config key is empty".into()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| CoreError::Custom(format!("unknown config key: {key}")))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| CoreError::Custom(format!("unknown config key: {key}")))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => {
                        let parsed = value.parse::<bool>().map_err(|_| {
                            CoreError::Custom(format!("cannot parse '{value}' as bool"))
                        })?;
                        serde_json::Value::Bool(parsed)
                    }
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Some(n) =
                            value.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
                        {
                            serde_json::Value::Number(n)
                        } else {
                            return Err(CoreError::Custom(format!(
                                "cannot parse '{value}' as number"
                            )));
                        }
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| CoreError::Custom(format!("unknown config key: {key}")))?;
        }

        Err(CoreError::Custom(format!("unknown config key: {key}")))
    }

    fn default_path() -> Result<PathBuf> {
        Ok(data_dir().map_err(CoreError::Store)?.join("config.toml"))
    }

    /// Load from an explicit path, writing the default file when absent.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| CoreError::Custom(e.to_string()))?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Custom(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from the default location or return default.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory only. Callers decide when to
    /// persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// Hold duration in milliseconds, ready for the gesture tracker.
    pub fn hold_duration_ms(&self) -> u64 {
        self.hold.duration_secs.saturating_mul(1_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.hold.duration_secs, 3);
        assert!(parsed.hold.celebration);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.hold.duration_secs, 3);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("hold.duration_secs").as_deref(), Some("3"));
        assert_eq!(cfg.get("hold.celebration").as_deref(), Some("true"));
        assert!(cfg.get("hold.missing_key").is_none());
    }

    #[test]
    fn set_updates_number_and_bool() {
        let mut cfg = Config::default();
        cfg.set("hold.duration_secs", "5").unwrap();
        cfg.set("hold.celebration", "false").unwrap();
        assert_eq!(cfg.hold.duration_secs, 5);
        assert!(!cfg.hold.celebration);
        assert_eq!(cfg.hold_duration_ms(), 5_000);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_value() {
        let mut cfg = Config::default();
        assert!(cfg.set("hold.nonexistent", "1").is_err());
        assert!(cfg.set("hold.celebration", "not_a_bool").is_err());
        assert_eq!(cfg.hold.duration_secs, 3);
    }

    #[test]
    fn load_from_writes_default_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.hold.duration_secs, 3);
        assert!(path.exists());

        // Second load reads the written file.
        let again = Config::load_from(&path).unwrap();
        assert!(again.hold.celebration);
    }
}
