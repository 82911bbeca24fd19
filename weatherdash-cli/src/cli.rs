use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::warn;
use weatherdash_core::{
    Config, Dashboard, DashboardError, FileStore, HistoryCache, KeyValueStore, SearchOutcome,
    SuggestionIndex, SummaryClient, provider_from_config, storage,
};

use crate::{completer::CityCompleter, output, presenter::ConsolePresenter};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the WeatherAPI.com key and the AI summary proxy.
    Configure,

    /// Show current weather and the 7-day forecast for a city.
    Search {
        city: String,

        /// Also ask the AI summary proxy for a short write-up.
        #[arg(long)]
        summary: bool,
    },

    /// Show weather at a coordinate pair. Not added to the search history.
    Locate {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lon: f64,

        #[arg(long)]
        summary: bool,
    },

    /// List cities matching the start of a name.
    Suggest {
        query: String,

        /// Choose one of the matches and search for it.
        #[arg(long)]
        pick: bool,
    },

    /// Show recent searches, newest first.
    History,

    /// Forget all recent searches.
    Clear,

    /// Turn forecast alerts on or off; prints the current state without an argument.
    Alerts {
        #[arg(value_enum)]
        state: Option<AlertSwitch>,
    },

    /// Search repeatedly with autocomplete; Esc quits.
    Interactive {
        #[arg(long)]
        summary: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlertSwitch {
    On,
    Off,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config)?,
            Command::Search { city, summary } => {
                let mut dash = build_dashboard(&config)?;
                search(&mut dash, &city, summary).await;
                print!("{}", output::render_history(dash.history()));
            }
            Command::Locate { lat, lon, summary } => {
                let dash = build_dashboard(&config)?;
                match dash.locate(lat, lon).await {
                    Ok(outcome) => show(&dash, &outcome, summary).await,
                    Err(_) => println!("⚠️ Could not get weather by coordinates!"),
                }
            }
            Command::Suggest { query, pick: false } => {
                let history = HistoryCache::open(open_store()?);
                let index = suggestion_index(&config);
                print!("{}", output::render_suggestions(&index.suggest(&query, history.entries())));
            }
            Command::Suggest { query, pick: true } => {
                let mut dash = build_dashboard(&config)?;
                match dash.pick_suggestion(&query) {
                    Some(city) => search(&mut dash, &city, false).await,
                    None => println!("No city picked."),
                }
            }
            Command::History => {
                let history = HistoryCache::open(open_store()?);
                print!("{}", output::render_history(history.entries()));
            }
            Command::Clear => {
                let mut history = HistoryCache::open(open_store()?);
                history.clear().context("Failed to clear search history")?;
                println!("Search history cleared.");
            }
            Command::Alerts { state } => {
                let store = open_store()?;
                if let Some(state) = state {
                    storage::set_alerts_enabled(store.as_ref(), state == AlertSwitch::On)
                        .context("Failed to save alert preference")?;
                }
                let label = if storage::alerts_enabled(store.as_ref()) { "on" } else { "off" };
                println!("Weather alerts are {label}.");
            }
            Command::Interactive { summary } => {
                let mut dash = build_dashboard(&config)?;
                interactive(&mut dash, summary).await?;
            }
        }

        Ok(())
    }
}

fn open_store() -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let dir = Config::data_dir()?;
    Ok(Arc::new(FileStore::new(dir)))
}

fn suggestion_index(config: &Config) -> SuggestionIndex {
    SuggestionIndex::with_default_cities(config.extra_cities.iter().cloned())
}

fn build_dashboard(config: &Config) -> anyhow::Result<Dashboard> {
    let provider = provider_from_config(config)?;
    let dash = Dashboard::new(
        provider,
        open_store()?,
        suggestion_index(config),
        Box::new(ConsolePresenter),
    );

    match SummaryClient::new(config.summary_endpoint()) {
        Ok(client) => Ok(dash.with_summary(client)),
        Err(err) => {
            warn!(error = %err, "AI summaries disabled");
            Ok(dash)
        }
    }
}

/// Run one search and print its outcome. Lookup failures are shown, not returned.
async fn search(dash: &mut Dashboard, city: &str, summary: bool) {
    match dash.search(city).await {
        Ok(outcome) => show(dash, &outcome, summary).await,
        Err(DashboardError::EmptyQuery) => println!("⚠️ {}", DashboardError::EmptyQuery),
        Err(err) => println!("⚠️ {city}: {err}"),
    }
}

async fn show(dash: &Dashboard, outcome: &SearchOutcome, summary: bool) {
    print!("{}", output::render_record(&outcome.record));

    if summary {
        if let Some(text) = dash.summarize(&outcome.record).await {
            println!();
            println!("🤖 {text}");
        }
    }
    println!();
}

async fn interactive(dash: &mut Dashboard, summary: bool) -> anyhow::Result<()> {
    loop {
        let completer = CityCompleter::new(dash.suggestion_index().clone(), dash.history());
        let city = Text::new("City:")
            .with_autocomplete(completer)
            .with_help_message("↑↓ to move, tab to complete, esc to quit")
            .prompt_skippable()?;

        match city {
            Some(city) => {
                search(dash, &city, summary).await;
                print!("{}", output::render_history(dash.history()));
            }
            None => return Ok(()),
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("WeatherAPI.com key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let endpoint =
        Text::new("AI summary endpoint:").with_default(config.summary_endpoint()).prompt()?;
    config.summary_endpoint = Some(endpoint.trim().to_string());

    let extra = Text::new("Extra cities for autocomplete (comma separated):")
        .with_default("")
        .prompt()?;
    for city in extra.split(',') {
        config.add_city(city);
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}
