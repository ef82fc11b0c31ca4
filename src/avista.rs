//! The scrape pipeline: fetch the avista page, filter the rate table, write
//! a dated snapshot file.

use anyhow::Result;
use chrono::Local;
use std::path::Path;
use tracing::info;

use crate::config::AppConfig;
use crate::export;
use crate::providers::seb_avista::SebAvistaProvider;
use crate::rates::AvistaRateProvider;

pub async fn run(config: &AppConfig) -> Result<()> {
    let provider = SebAvistaProvider::new(&config.avista.page_url);
    run_with_provider(&provider, Path::new(&config.avista.output_dir)).await
}

pub async fn run_with_provider(
    provider: &dyn AvistaRateProvider,
    output_dir: &Path,
) -> Result<()> {
    let rows = provider.fetch_rows().await?;

    // File name and load timestamp use the host's local clock; the scheduler
    // is expected to run in Swedish time.
    let now = Local::now();
    let load_timestamp = now.format("%Y-%m-%d %H:%M").to_string();
    let path = export::write_avista_csv(output_dir, now.date_naive(), &rows, &load_timestamp)?;

    info!(
        rows = rows.len(),
        path = %path.display(),
        "Avista snapshot written"
    );
    println!("Wrote {} with {} rows.", path.display(), rows.len());
    Ok(())
}
