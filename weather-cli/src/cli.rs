use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use std::path::PathBuf;
use weather_core::{
    Config, HistoryStore, JsonFileMedium, OpenWeatherClient, Resolver, WeatherService,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "City weather lookups with search history")]
pub struct Cli {
    /// Use this history file instead of the configured one.
    #[arg(long, global = true)]
    pub history_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API base URL and key interactively.
    Configure,

    /// Show current weather and a 5-day forecast for a city, and remember it.
    Show {
        /// City name, e.g. "Paris".
        city: String,
    },

    /// List previously searched cities.
    History,

    /// Remove a city from the search history by id.
    Forget {
        /// Entry id as printed by `weather history`.
        id: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let history_file = self.history_file;
        let load = || -> Result<Config> {
            Ok(effective_config(Config::load()?, history_file.clone()))
        };

        match self.command {
            // Only file values may be saved back, so env and flags are skipped.
            Command::Configure => configure(Config::load_file()?),
            Command::Show { city } => {
                let service = build_service(&load()?).await?;
                let series = service.search(&city).await?;
                output::print_forecast(&series)?;
                Ok(())
            }
            Command::History => {
                let store = open_history(&load()?).await?;
                output::print_history(&store.list().await?)?;
                Ok(())
            }
            Command::Forget { id } => {
                let store = open_history(&load()?).await?;
                store.remove(&id).await?;
                println!("City deleted successfully");
                Ok(())
            }
        }
    }
}

/// Applies one-off command-line overrides on top of the loaded config.
fn effective_config(mut config: Config, history_file: Option<PathBuf>) -> Config {
    if let Some(path) = history_file {
        config.history_file = Some(path);
    }
    config
}

async fn open_history(config: &Config) -> Result<HistoryStore<JsonFileMedium>> {
    let path = config.history_path()?;
    tracing::debug!(path = %path.display(), "opening search history");
    let medium = JsonFileMedium::open(&path)
        .await
        .with_context(|| format!("Failed to open search history: {}", path.display()))?;
    Ok(HistoryStore::new(medium))
}

async fn build_service(config: &Config) -> Result<WeatherService<JsonFileMedium>> {
    let client = OpenWeatherClient::from_config(config)?;
    let resolver = Resolver::new(Box::new(client.clone()), Box::new(client));
    Ok(WeatherService::new(resolver, open_history(config).await?))
}

fn configure(mut config: Config) -> Result<()> {
    config.api_base_url = Text::new("API base URL:")
        .with_default(&config.api_base_url)
        .prompt()
        .context("Failed to read API base URL")?;

    let key = Password::new("API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !key.trim().is_empty() {
        config.api_key = Some(key.trim().to_string());
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_show_with_global_history_file() {
        let cli = Cli::try_parse_from(["weather", "show", "New York", "--history-file", "/tmp/h.json"])
            .unwrap();

        assert_eq!(cli.history_file, Some(PathBuf::from("/tmp/h.json")));
        assert!(matches!(cli.command, Command::Show { ref city } if city == "New York"));
    }

    #[test]
    fn history_file_flag_overrides_config() {
        let config = effective_config(Config::default(), Some(PathBuf::from("/tmp/h.json")));
        assert_eq!(config.history_path().unwrap(), PathBuf::from("/tmp/h.json"));

        let stored = Config { history_file: Some("/data/h.json".into()), ..Config::default() };
        assert_eq!(effective_config(stored.clone(), None), stored);
    }

    #[test]
    fn forget_requires_an_id() {
        assert!(Cli::try_parse_from(["weather", "forget"]).is_err());
    }
}
