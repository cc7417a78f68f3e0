use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use city_weather_core::{
    CityTracker, Config, FileBackend, ProviderId, WeatherStore, provider::default_provider_from_config,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Track current weather for your cities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather".
        provider: String,
    },

    /// Look up a city and add it to the saved list.
    Add {
        /// City name, e.g. "New York".
        city: String,
    },

    /// List saved cities and when each was last updated.
    List,

    /// Remove a saved city. The name must match exactly.
    Remove { city: String },

    /// Fetch current weather for a saved city and record it.
    Show { city: String },

    /// Show recorded weather for a city, newest first.
    History {
        city: String,

        /// Only show the most recent N entries.
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure { provider } => configure(config, &provider)?,
            Command::Add { city } => {
                let added = tracker(&config)?.add_city(&city).await?;
                println!("{} added successfully\n", added.city.name);
                print!("{}", output::city_list(&added.cities));
            }
            Command::List => {
                let store = open_store(&config)?;
                let mut rows = Vec::new();
                for city in store.get_cities().await {
                    let updated = store
                        .latest_entry(&city.name)
                        .await
                        .map(|entry| entry.timestamp.with_timezone(&chrono::Local));
                    rows.push((city, updated));
                }
                print!("{}", output::saved_cities(&rows)?);
            }
            Command::Remove { city } => {
                let cities = open_store(&config)?.remove_city(&city).await?;
                println!("{city} removed\n");
                print!("{}", output::city_list(&cities));
            }
            Command::Show { city } => {
                let refreshed = tracker(&config)?.refresh_city(&city).await?;
                let fetched_at = refreshed
                    .history
                    .first()
                    .map(|entry| entry.timestamp.with_timezone(&chrono::Local))
                    .unwrap_or_else(chrono::Local::now);
                print!("{}", output::detail(&city, &refreshed.snapshot, &fetched_at)?);
            }
            Command::History { city, limit } => {
                let entries = open_store(&config)?.get_historical_data(&city).await;
                let shown = limit.unwrap_or(entries.len()).min(entries.len());
                print!("{}", output::history(&city, &entries[..shown])?);
            }
        }

        Ok(())
    }
}

fn configure(mut config: Config, provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key.trim().to_string());
    config.save()?;

    println!(
        "Saved credentials for {id} to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<Arc<WeatherStore>> {
    let dir = config.data_dir()?;
    tracing::debug!(dir = %dir.display(), "opening weather store");

    let backend = Arc::new(FileBackend::new(dir));
    Ok(Arc::new(WeatherStore::with_options(
        backend,
        config.store_options(),
    )))
}

fn tracker(config: &Config) -> anyhow::Result<CityTracker> {
    let provider = default_provider_from_config(config)?;
    Ok(CityTracker::new(open_store(config)?, provider))
}
