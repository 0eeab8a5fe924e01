use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Select};
use skyview_core::{Config, Controller, provider_from_config};
use tracing::info;

use crate::view::TerminalView;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyview", version, about = "Weather, forecast and air quality for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather for a location, e.g. "Paris" or "London, GB".
    Show {
        location: String,
    },

    /// List matching locations for partial input.
    Suggest {
        query: String,
    },

    /// Pick one of the matching locations interactively and show its weather.
    Pick {
        query: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location } => {
                let controller = controller()?;
                controller.init().await;
                controller.set_input(location).await;
                report_search(&controller, controller.search().await).await
            }
            Command::Suggest { query } => {
                let controller = controller()?;
                controller.set_input(query).await;
                controller.suggest_now().await;
                controller.view().await.target().print_suggestions();
                Ok(())
            }
            Command::Pick { query } => {
                let controller = controller()?;
                controller.init().await;
                controller.set_input(query).await;
                controller.suggest_now().await;

                let candidates = controller.view().await.target().suggestions().to_vec();
                if candidates.is_empty() {
                    println!("No matching locations.");
                    return Ok(());
                }

                let labels: Vec<String> = candidates
                    .iter()
                    .map(|c| format!("{} ({})", c.name, c.region_label()))
                    .collect();
                let choice = Select::new("Location:", labels)
                    .raw_prompt()
                    .context("Location selection cancelled")?;

                let result = controller
                    .select_suggestion(&candidates[choice.index])
                    .await;
                report_search(&controller, result).await
            }
        }
    }
}

fn controller() -> anyhow::Result<Controller<TerminalView>> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    Ok(Controller::new(provider, TerminalView::default(), &config))
}

async fn report_search(
    controller: &Controller<TerminalView>,
    result: skyview_core::error::Result<Option<skyview_core::SearchReport>>,
) -> anyhow::Result<()> {
    let view = controller.view().await;
    match result {
        Ok(Some(_)) => {
            view.target().print_weather();
            Ok(())
        }
        Ok(None) => {
            for alert in view.target().alerts() {
                println!("{alert}");
            }
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    let path = Config::config_file_path()?;
    info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(())
}
