use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_API_BASE_URL: &str = "https://api.openweathermap.org";

/// Environment variables that override the config file.
pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
pub const ENV_API_KEY: &str = "API_KEY";

const HISTORY_FILE_NAME: &str = "searchHistory.json";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_base_url = "https://api.openweathermap.org"
/// api_key = "..."
/// history_file = "/home/me/weather/searchHistory.json"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub api_key: Option<String>,
    /// Where the search history lives; defaults to the platform data dir.
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            history_file: None,
        }
    }
}

impl Config {
    /// Load config from disk (or defaults on first run), then apply
    /// `API_BASE_URL` / `API_KEY` from the environment.
    ///
    /// The result is for running commands; never [`save`](Self::save) it,
    /// or environment values end up in the config file.
    pub fn load() -> Result<Self> {
        Ok(Self::load_file()?.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Only what is stored in the config file, without environment overrides.
    pub fn load_file() -> Result<Self> {
        Self::read_from(&Self::config_file_path()?)
    }

    /// Reads a config file, or returns defaults if it does not exist yet.
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies non-empty values returned by `lookup` for the override variables.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        self
    }

    /// Save config to the platform config file.
    pub fn save(&self) -> Result<()> {
        self.write_to(&Self::config_file_path()?)
    }

    /// Write config to `path`, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather configure` or set {ENV_API_KEY} in the environment."
            )
        })
    }

    /// Configured history file, or `searchHistory.json` in the platform data dir.
    pub fn history_path(&self) -> Result<PathBuf> {
        match &self.history_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(HISTORY_FILE_NAME)),
        }
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-task", "weather-cli")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
