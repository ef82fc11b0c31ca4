use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use sebfx::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for sebfx::AppCommand {
    fn from(cmd: Commands) -> sebfx::AppCommand {
        match cmd {
            Commands::Spot => sebfx::AppCommand::Spot,
            Commands::Avista => sebfx::AppCommand::Avista,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch FX spot rates from the SEB API and append them to the rates CSV
    Spot,
    /// Scrape the SEB avista page and write a dated CSV snapshot
    Avista,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => sebfx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Run failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = sebfx::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
spot:
  base_url: "https://api.sebgroup.com/open/prod/fxrates/v3"
  unit_currency: "SEK"
  output_path: "fx_rates_sek.csv"

avista:
  page_url: "https://seb.se/marknaden-och-kurslistor/valutakurser-avistakurser"
  output_dir: "."
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
