use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::tracker::DebouncePeriods;

/// Application config, read from `config.toml`.
///
/// Word-count settings (goal, folders, pastes) live in the data file
/// instead; this covers where that file is and how eagerly it is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_file")]
    pub data_file: String,

    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,

    #[serde(default = "default_status_debounce_ms")]
    pub status_debounce_ms: u64,

    #[serde(default = "default_dashboard_debounce_ms")]
    pub dashboard_debounce_ms: u64,
}

fn app_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("writer-stats");
    path
}

fn default_data_file() -> String {
    app_dir().join("data.json").to_string_lossy().to_string()
}

fn default_save_debounce_ms() -> u64 {
    2000
}

fn default_status_debounce_ms() -> u64 {
    300
}

fn default_dashboard_debounce_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: default_data_file(),
            save_debounce_ms: default_save_debounce_ms(),
            status_debounce_ms: default_status_debounce_ms(),
            dashboard_debounce_ms: default_dashboard_debounce_ms(),
        }
    }
}

impl Config {
    /// Loads the config from the standard location, writing a default file
    /// on first run. Never fails: problems are logged and defaults used.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let mut config: Config = toml::from_str(&contents).unwrap_or_else(|e| {
                    log::warn!("error parsing config file {}: {}", path.display(), e);
                    Self::default()
                });
                config.data_file = expand_tilde(&config.data_file);
                config
            }
            Err(_) => {
                // Create default config file if it doesn't exist
                let default_config = Self::default();
                if let Err(e) = default_config.save_to(path) {
                    log::warn!("error creating default config file: {}", e);
                }
                default_config
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        app_dir().join("config.toml")
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_file)
    }

    pub fn debounce_periods(&self) -> DebouncePeriods {
        DebouncePeriods {
            save: Duration::from_millis(self.save_debounce_ms),
            status: Duration::from_millis(self.status_debounce_ms),
            dashboard: Duration::from_millis(self.dashboard_debounce_ms),
        }
    }
}

// "~/stats.json" -> "/home/me/stats.json"
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{}", home.to_string_lossy(), rest);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let config = Config::load_from(&path);
        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_file = \"/tmp/words.json\"\nsave_debounce_ms = 50\n").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.data_path(), PathBuf::from("/tmp/words.json"));
        let periods = config.debounce_periods();
        assert_eq!(periods.save, Duration::from_millis(50));
        assert_eq!(periods.status, Duration::from_millis(300));
        assert_eq!(periods.dashboard, Duration::from_millis(1000));
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "save_debounce_ms = \"soon\"").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            let expanded = expand_tilde("~/stats.json");
            assert_eq!(expanded, format!("{}/stats.json", home.to_string_lossy()));
        }
        assert_eq!(expand_tilde("/abs/stats.json"), "/abs/stats.json");
    }
}
