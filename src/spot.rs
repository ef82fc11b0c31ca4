//! The API pipeline: fetch the spot feed, normalize, append to the
//! accumulating CSV.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::config::AppConfig;
use crate::export;
use crate::providers::seb_spot::SebSpotProvider;
use crate::rates::SpotRateProvider;

pub async fn run(config: &AppConfig) -> Result<()> {
    // Credential resolution happens before any network or file I/O.
    let api_key = config.spot.resolve_api_key()?;
    let provider = SebSpotProvider::new(
        &config.spot.base_url,
        &api_key,
        &config.spot.unit_currency,
    );
    run_with_provider(&provider, Path::new(&config.spot.output_path)).await
}

pub async fn run_with_provider(
    provider: &dyn SpotRateProvider,
    output_path: &Path,
) -> Result<()> {
    let snapshot = provider.fetch_snapshot().await?;
    let written = export::append_spot_csv(output_path, &snapshot)?;

    info!(
        rows = written,
        path = %output_path.display(),
        "Spot snapshot appended"
    );
    println!("Wrote {} rows to {}", written, output_path.display());
    Ok(())
}
