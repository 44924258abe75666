use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::constants;

pub const CONFIG_FILE: &str = "prefs.toml";

/// User preferences read from `prefs.toml` in the platform config dir.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
  pub theme_name: Option<String>,
  pub api_key: Option<String>,
  pub base_url: Option<String>,
  pub log_level: Option<String>,
}

impl Config {
  pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "popcorn")
  }

  pub fn load() -> Self {
    if let Some(proj_dirs) = Self::project_dirs() {
      let config_file = proj_dirs.config_dir().join(CONFIG_FILE);
      if let Ok(content) = std::fs::read_to_string(config_file) {
        return Self::parse(&content);
      }
    }
    Self::default()
  }

  /// Parse a prefs file, falling back to defaults when it is malformed.
  pub fn parse(content: &str) -> Self {
    toml::from_str(content).unwrap_or_default()
  }

  pub fn save(&self) {
    if let Some(proj_dirs) = Self::project_dirs() {
      let config_dir = proj_dirs.config_dir();
      if std::fs::create_dir_all(config_dir).is_ok() {
        let config_file = config_dir.join(CONFIG_FILE);
        if let Ok(content) = toml::to_string(self) {
          let _ = std::fs::write(config_file, content);
        }
      }
    }
  }

  /// Directory for the log file. Falls back to the temp dir when no home is known.
  pub fn log_dir() -> PathBuf {
    Self::project_dirs().map(|d| d.data_local_dir().to_path_buf()).unwrap_or_else(std::env::temp_dir)
  }
}

/// Provider settings resolved once at startup and injected into the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
  pub api_key: String,
  pub base_url: String,
}

impl ApiSettings {
  /// Resolution order: CLI flag, `OMDB_API_KEY` (key only), config file, embedded default.
  pub fn resolve(cli_key: Option<String>, cli_url: Option<String>, env_key: Option<String>, config: &Config) -> Self {
    let non_empty = |s: &String| !s.trim().is_empty();
    let api_key = cli_key
      .filter(non_empty)
      .or(env_key.filter(non_empty))
      .or(config.api_key.clone().filter(non_empty))
      .unwrap_or_else(|| constants().default_api_key.clone());
    let base_url = cli_url
      .filter(non_empty)
      .or(config.base_url.clone().filter(non_empty))
      .unwrap_or_else(|| constants().omdb_base_url.clone());
    Self { api_key, base_url }
  }
}
