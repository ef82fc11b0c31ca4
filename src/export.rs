//! CSV output for both pipelines.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::rates::{AvistaRow, SpotSnapshot};

/// Canonical spot schema. Two column sets existed historically (a 6-column
/// one without bid/offer); this is the newer 7-column set and the only one
/// this crate writes.
pub const SPOT_HEADER: [&str; 7] = [
    "retrieval_date",
    "listed_currency",
    "exchange_rate",
    "bid_rate",
    "offer_rate",
    "last_updated_time",
    "unit_currency",
];

pub const AVISTA_HEADER: [&str; 6] = ["Land", "Valuta", "Köpkurs", "Säljkurs", "Datum", "LoadDate"];

fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{r:.6}")).unwrap_or_default()
}

fn display_rate(rate: Option<f64>) -> String {
    rate.map(|r| r.to_string()).unwrap_or_default()
}

/// Appends the snapshot to `path`, writing the header first only when the
/// file does not exist yet. All columns are always emitted, with empty
/// strings for missing rates, so the file stays well-formed across runs.
/// Re-running on the same data appends duplicate rows; deduplication is left
/// to downstream consumers.
pub fn append_spot_csv(path: &Path, snapshot: &SpotSnapshot) -> Result<usize> {
    let write_header = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    if write_header {
        writer.write_record(SPOT_HEADER)?;
    }
    for record in &snapshot.records {
        let mid = format_rate(record.mid_rate);
        let bid = format_rate(record.bid_rate);
        let offer = format_rate(record.offer_rate);
        writer.write_record([
            snapshot.retrieval_date.as_str(),
            record.listed_currency.as_str(),
            mid.as_str(),
            bid.as_str(),
            offer.as_str(),
            record.last_updated_time.as_str(),
            snapshot.unit_currency.as_str(),
        ])?;
    }
    writer.flush()?;

    debug!(
        "Appended {} rows to {} (header written: {})",
        snapshot.records.len(),
        path.display(),
        write_header
    );
    Ok(snapshot.records.len())
}

/// Writes the dated snapshot file, overwriting any existing file for the
/// same date so a re-run within one day is idempotent. The leading UTF-8
/// byte-order mark keeps spreadsheet imports happy.
pub fn write_avista_csv(
    dir: &Path,
    date: NaiveDate,
    rows: &[AvistaRow],
    load_timestamp: &str,
) -> Result<PathBuf> {
    let file_name = format!("SEB_Avista_{}.csv", date.format("%Y%m%d"));
    let path = dir.join(file_name);

    let mut file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all("\u{FEFF}".as_bytes())?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(AVISTA_HEADER)?;
    for row in rows {
        let buy = display_rate(row.buy_rate);
        let sell = display_rate(row.sell_rate);
        writer.write_record([
            row.country.as_str(),
            row.currency.as_str(),
            buy.as_str(),
            sell.as_str(),
            row.quoted_date.as_str(),
            load_timestamp,
        ])?;
    }
    writer.flush()?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(path)
}
