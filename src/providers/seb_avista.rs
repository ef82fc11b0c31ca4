use anyhow::{Result, anyhow};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::normalize::parse_locale_number;
use crate::rates::{AvistaRateProvider, AvistaRow};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Structural selector for the rate table on the avista page.
const ROW_SELECTOR: &str = "table.table.text-nowrap.w-100 tr";

// Country names exactly as printed on the page.
const TARGET_COUNTRIES: [&str; 3] = ["Euro", "Storbritannien", "USA"];

// SebAvistaProvider implementation for AvistaRateProvider
pub struct SebAvistaProvider {
    page_url: String,
}

impl SebAvistaProvider {
    pub fn new(page_url: &str) -> Self {
        SebAvistaProvider {
            page_url: page_url.to_string(),
        }
    }
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Extracts the accepted rows from the avista page. A row qualifies only if
/// it has exactly 5 cells and its first cell names a target country; all
/// other rows are skipped silently.
pub fn parse_rate_table(html: &str) -> Result<Vec<AvistaRow>> {
    let document = Html::parse_document(html);
    let row_selector =
        Selector::parse(ROW_SELECTOR).map_err(|e| anyhow!("Invalid row selector: {e}"))?;
    let cell_selector = Selector::parse("td").map_err(|e| anyhow!("Invalid cell selector: {e}"))?;

    let mut rows = Vec::new();
    for tr in document.select(&row_selector) {
        let cells: Vec<_> = tr.select(&cell_selector).collect();
        if cells.len() != 5 {
            continue;
        }
        let country = cell_text(&cells[0]);
        if !TARGET_COUNTRIES.contains(&country.as_str()) {
            continue;
        }
        rows.push(AvistaRow {
            country,
            currency: cell_text(&cells[1]),
            buy_rate: parse_locale_number(&cell_text(&cells[2])),
            sell_rate: parse_locale_number(&cell_text(&cells[3])),
            quoted_date: cell_text(&cells[4]),
        });
    }
    Ok(rows)
}

#[async_trait]
impl AvistaRateProvider for SebAvistaProvider {
    #[instrument(name = "AvistaScrape", skip(self))]
    async fn fetch_rows(&self) -> Result<Vec<AvistaRow>> {
        debug!("Requesting avista page from {}", self.page_url);

        let client = reqwest::Client::builder()
            .user_agent("sebfx/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client
            .get(&self.page_url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, self.page_url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} from avista page",
                response.status()
            ));
        }

        let html = response.text().await?;
        let rows = parse_rate_table(&html)?;
        debug!("Accepted {} rows from avista table", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE_PAGE: &str = r#"
        <html><body>
        <table class="table text-nowrap w-100">
            <tr><th>Land</th><th>Valuta</th><th>Köpkurs</th><th>Säljkurs</th><th>Datum</th></tr>
            <tr><td>Euro</td><td>EUR</td><td>11,23</td><td>11,69</td><td>2025-10-15</td></tr>
            <tr><td>Storbritannien</td><td>GBP</td><td>12,95</td><td>13,48</td><td>2025-10-15</td></tr>
            <tr><td>USA</td><td>USD</td><td>9,87</td><td>10,28</td><td>2025-10-15</td></tr>
            <tr><td>Norge</td><td>NOK</td><td>0,93</td><td>0,97</td><td>2025-10-15</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_parses_only_target_countries() {
        let rows = parse_rate_table(SAMPLE_PAGE).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            AvistaRow {
                country: "Euro".to_string(),
                currency: "EUR".to_string(),
                buy_rate: Some(11.23),
                sell_rate: Some(11.69),
                quoted_date: "2025-10-15".to_string(),
            }
        );
        assert_eq!(rows[1].country, "Storbritannien");
        assert_eq!(rows[2].country, "USA");
        assert!(!rows.iter().any(|r| r.country == "Norge"));
    }

    #[test]
    fn test_skips_rows_with_wrong_column_count() {
        let html = r#"
            <table class="table text-nowrap w-100">
                <tr><td>USA</td><td>USD</td><td>9,87</td><td>10,28</td></tr>
                <tr><td>USA</td><td>USD</td><td>9,87</td><td>10,28</td><td>2025-10-15</td><td>extra</td></tr>
                <tr><td>Euro</td><td>EUR</td><td>11,23</td><td>11,69</td><td>2025-10-15</td></tr>
            </table>
        "#;
        let rows = parse_rate_table(html).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country, "Euro");
    }

    #[test]
    fn test_dash_and_nbsp_cells() {
        let html = "<table class=\"table text-nowrap w-100\">\
            <tr><td>USA</td><td>USD</td><td>1\u{A0}234,56</td><td>-</td><td>2025-10-15</td></tr>\
            </table>";
        let rows = parse_rate_table(html).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].buy_rate, Some(1234.56));
        assert_eq!(rows[0].sell_rate, None);
    }

    #[test]
    fn test_ignores_tables_without_the_expected_classes() {
        let html = r#"
            <table class="table">
                <tr><td>USA</td><td>USD</td><td>9,87</td><td>10,28</td><td>2025-10-15</td></tr>
            </table>
        "#;
        let rows = parse_rate_table(html).unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_successful_page_fetch() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/valutakurser"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_PAGE))
            .mount(&mock_server)
            .await;

        let provider = SebAvistaProvider::new(&format!("{}/valutakurser", mock_server.uri()));
        let rows = provider.fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_http_error_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/valutakurser"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let provider = SebAvistaProvider::new(&format!("{}/valutakurser", mock_server.uri()));
        let result = provider.fetch_rows().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 503 Service Unavailable from avista page"
        );
    }
}
