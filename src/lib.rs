pub mod avista;
pub mod config;
pub mod export;
pub mod log;
pub mod normalize;
pub mod providers;
pub mod rates;
pub mod spot;

use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Spot,
    Avista,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("SEB rate collector starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Spot => spot::run(&config).await,
        AppCommand::Avista => avista::run(&config).await,
    }
}
