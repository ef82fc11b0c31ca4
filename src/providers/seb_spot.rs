use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::normalize::{descale_rate, parse_locale_number};
use crate::rates::{RateRecord, SpotRateProvider, SpotSnapshot};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

// SebSpotProvider implementation for SpotRateProvider
pub struct SebSpotProvider {
    base_url: String,
    client_id: String,
    unit_currency: String,
}

impl SebSpotProvider {
    /// The credential is passed in explicitly so tests can substitute a fake
    /// key together with a mock base URL.
    pub fn new(base_url: &str, client_id: &str, unit_currency: &str) -> Self {
        SebSpotProvider {
            base_url: base_url.to_string(),
            client_id: client_id.to_string(),
            unit_currency: unit_currency.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct SpotResponse {
    unit_currency: String,
    fx_spot_exchange_rates: Vec<SpotEnvelope>,
}

#[derive(Deserialize, Debug)]
struct SpotEnvelope {
    retrieval_date: String,
    #[serde(default)]
    fx_spot_mid_exchange_rates: Vec<RawRate>,
}

// Rate fields arrive as strings in the feed; absent fields default to "".
#[derive(Deserialize, Debug)]
struct RawRate {
    #[serde(default)]
    listed_currency: String,
    #[serde(default)]
    exchange_rate: String,
    #[serde(default)]
    bid_rate: String,
    #[serde(default)]
    offer_rate: String,
    #[serde(default)]
    last_updated_time: String,
}

fn normalize_rate(raw: &str) -> Option<f64> {
    parse_locale_number(raw).map(descale_rate)
}

#[async_trait]
impl SpotRateProvider for SebSpotProvider {
    #[instrument(name = "SpotRateFetch", skip(self))]
    async fn fetch_snapshot(&self) -> Result<SpotSnapshot> {
        let url = format!(
            "{}/fx-spot-exchange-rate?unit_currency={}",
            self.base_url, self.unit_currency
        );
        debug!("Requesting spot rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("sebfx/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client
            .get(&url)
            .header("X-IBM-Client-Id", &self.client_id)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} from spot endpoint",
                response.status()
            ));
        }

        let data = response
            .json::<SpotResponse>()
            .await
            .map_err(|e| anyhow!("Failed to parse spot response: {}", e))?;

        let envelope = data
            .fx_spot_exchange_rates
            .first()
            .ok_or_else(|| anyhow!("no fx_spot_exchange_rates in response"))?;

        let records = envelope
            .fx_spot_mid_exchange_rates
            .iter()
            .map(|raw| RateRecord {
                listed_currency: raw.listed_currency.clone(),
                mid_rate: normalize_rate(&raw.exchange_rate),
                bid_rate: normalize_rate(&raw.bid_rate),
                offer_rate: normalize_rate(&raw.offer_rate),
                last_updated_time: raw.last_updated_time.clone(),
            })
            .collect();

        debug!(
            "Fetched {} spot records for unit currency {}",
            envelope.fx_spot_mid_exchange_rates.len(),
            data.unit_currency
        );

        Ok(SpotSnapshot {
            unit_currency: data.unit_currency,
            retrieval_date: envelope.retrieval_date.clone(),
            records,
        })
    }
}
