use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::presets::PRESETS;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Zero-based preset used when no text is given; random when unset.
    #[serde(default)]
    pub default_preset: Option<usize>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub data_dir: Option<String>,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            default_preset: None,
            log_filter: default_log_filter(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typemeter")
            .join("config.toml")
    }

    /// Directory holding the history file and the log.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("typemeter"),
        }
    }

    /// Drop values that no longer point at anything.
    pub fn validate(&mut self) {
        if self.default_preset.is_some_and(|i| i >= PRESETS.len()) {
            self.default_preset = None;
        }
        if self.log_filter.trim().is_empty() {
            self.log_filter = default_log_filter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.default_preset, None);
        assert_eq!(config.log_filter, "warn");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
theme = "terminal-default"
default_preset = 2
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.default_preset, Some(2));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.default_preset = Some(1);
        config.data_dir = Some("/tmp/typemeter-data".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.default_preset, Some(1));
        assert_eq!(deserialized.data_dir, config.data_dir);
    }

    #[test]
    fn test_validate_drops_out_of_range_preset() {
        let mut config = Config::default();
        config.default_preset = Some(PRESETS.len());
        config.log_filter = "  ".to_string();
        config.validate();
        assert_eq!(config.default_preset, None);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = Config::default();
        config.data_dir = Some("/srv/typemeter".to_string());
        assert_eq!(config.data_dir(), PathBuf::from("/srv/typemeter"));
        config.data_dir = Some(String::new());
        assert!(config.data_dir().ends_with("typemeter"));
    }
}
