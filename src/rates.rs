//! Record types and provider seams for the two rate feeds.

use anyhow::Result;
use async_trait::async_trait;

/// One normalized spot rate from the API feed. Rate fields are `None` when
/// the feed omits them or the raw cell does not parse.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    pub listed_currency: String,
    pub mid_rate: Option<f64>,
    pub bid_rate: Option<f64>,
    pub offer_rate: Option<f64>,
    pub last_updated_time: String,
}

/// The authoritative record set of one spot run: the first snapshot of the
/// envelope, with its retrieval timestamp and base currency.
#[derive(Debug, Clone)]
pub struct SpotSnapshot {
    pub unit_currency: String,
    pub retrieval_date: String,
    pub records: Vec<RateRecord>,
}

/// One accepted row from the avista rate table. `quoted_date` is the date
/// string exactly as shown on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct AvistaRow {
    pub country: String,
    pub currency: String,
    pub buy_rate: Option<f64>,
    pub sell_rate: Option<f64>,
    pub quoted_date: String,
}

#[async_trait]
pub trait SpotRateProvider: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<SpotSnapshot>;
}

#[async_trait]
pub trait AvistaRateProvider: Send + Sync {
    async fn fetch_rows(&self) -> Result<Vec<AvistaRow>>;
}
