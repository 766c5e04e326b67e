pub mod cli;
pub mod core;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::store::TipStore;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Analyze { captures: Vec<PathBuf> },
    Stats { video: Option<String> },
    Videos,
    Tips { video: String },
    Currencies,
    Rates,
    Parse { text: String },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Super Thanks tally starting...");

    // Parsing a single fragment needs neither config nor storage.
    if let AppCommand::Parse { text } = &command {
        return cli::browse::run_parse(text);
    }

    let config = load_config(config_path)?;
    let store = store::open(&config).await?;
    execute(command, &config, store.as_ref()).await
}

/// Runs `command` against an already opened store.
pub async fn execute(command: AppCommand, config: &AppConfig, store: &dyn TipStore) -> Result<()> {
    let canonical = config.canonical_currency.as_str();
    match command {
        AppCommand::Analyze { captures } => {
            cli::analyze::run(&captures, config, store).await?;
            Ok(())
        }
        AppCommand::Stats { video } => {
            let video_id = video.as_deref().map(crate::core::video::extract_video_id);
            cli::stats::run(store, video_id.as_deref(), canonical).await
        }
        AppCommand::Videos => cli::browse::run_videos(store).await,
        AppCommand::Tips { video } => cli::browse::run_tips(store, &video, canonical).await,
        AppCommand::Currencies => cli::stats::run_currencies(store, canonical).await,
        AppCommand::Rates => cli::browse::run_rates(store, canonical).await,
        AppCommand::Parse { text } => cli::browse::run_parse(&text),
    }
}
