use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable consulted when `spot.api_key` is not set.
pub const API_KEY_ENV: &str = "SEB_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SpotConfig {
    pub base_url: String,
    pub unit_currency: String,
    /// Explicit credential; falls back to the `SEB_API_KEY` environment variable.
    pub api_key: Option<String>,
    pub output_path: String,
}

impl Default for SpotConfig {
    fn default() -> Self {
        SpotConfig {
            base_url: "https://api.sebgroup.com/open/prod/fxrates/v3".to_string(),
            unit_currency: "SEK".to_string(),
            api_key: None,
            output_path: "fx_rates_sek.csv".to_string(),
        }
    }
}

impl SpotConfig {
    /// Resolves the API credential at startup so the fetch client can be
    /// constructed with an explicit value. Absence is fatal.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => bail!(
                "Missing API key: set spot.api_key in the config file or the {API_KEY_ENV} environment variable"
            ),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AvistaConfig {
    pub page_url: String,
    pub output_dir: String,
}

impl Default for AvistaConfig {
    fn default() -> Self {
        AvistaConfig {
            page_url: "https://seb.se/marknaden-och-kurslistor/valutakurser-avistakurser"
                .to_string(),
            output_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub spot: SpotConfig,
    pub avista: AvistaConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists. Only the API key is mandatory, and that
    /// is checked when the spot pipeline starts.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("se", "sebfx", "sebfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
