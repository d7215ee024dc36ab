//! Alpha Vantage weekly adjusted prices
//!
//! `TIME_SERIES_WEEKLY_ADJUSTED` returns one row per week (Friday close),
//! so a 200-row rolling window is 200 weeks.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::core::types::WeeklyQuote;

const FUNCTION: &str = "TIME_SERIES_WEEKLY_ADJUSTED";

pub struct AlphaVantageClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct WeeklyResponse {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Weekly Adjusted Time Series")]
    series: Option<BTreeMap<String, RawWeek>>,
}

#[derive(Debug, Deserialize)]
struct RawWeek {
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. adjusted close")]
    adjusted_close: String,
    #[serde(rename = "6. volume", default)]
    volume: Option<String>,
}

impl AlphaVantageClient {
    pub fn new(api_key: String, cfg: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            api_key,
            base_url: cfg.base_url.clone(),
            client,
        })
    }

    /// Fetch the full weekly history for `symbol`, oldest first
    pub async fn fetch_weekly(&self, symbol: &str) -> Result<Vec<WeeklyQuote>> {
        debug!("Fetching weekly series for {}", symbol);

        let body = self.client
            .get(&self.base_url)
            .query(&[
                ("function", FUNCTION),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("requesting {}", symbol))?
            .error_for_status()?
            .text()
            .await?;

        parse_weekly_response(&body).with_context(|| format!("weekly series for {}", symbol))
    }
}

/// Parse a weekly adjusted response body into quotes sorted by date
pub fn parse_weekly_response(body: &str) -> Result<Vec<WeeklyQuote>> {
    let resp: WeeklyResponse = serde_json::from_str(body).context("malformed provider response")?;

    if let Some(msg) = resp.error_message {
        bail!("API error: {}", msg);
    }
    if let Some(msg) = resp.note.or(resp.information) {
        bail!("Rate limit hit: {}", msg);
    }

    let series = resp.series.unwrap_or_default();
    if series.is_empty() {
        bail!("No data returned");
    }

    let mut quotes = Vec::with_capacity(series.len());
    for (date, week) in series {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("bad date {:?}", date))?;
        quotes.push(WeeklyQuote {
            date,
            close: parse_decimal(&week.close, date)?,
            adjusted_close: parse_decimal(&week.adjusted_close, date)?,
            volume: week
                .volume
                .as_deref()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(0),
        });
    }

    quotes.sort_by_key(|q| q.date);
    Ok(quotes)
}

fn parse_decimal(raw: &str, date: NaiveDate) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| anyhow!("bad price {:?} on {}: {}", raw, date, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"{
        "Meta Data": {"2. Symbol": "KO"},
        "Weekly Adjusted Time Series": {
            "2024-01-12": {
                "1. open": "59.5", "2. high": "60.1", "3. low": "59.0",
                "4. close": "60.00", "5. adjusted close": "59.10",
                "6. volume": "71234500", "7. dividend amount": "0.0000"
            },
            "2024-01-05": {
                "1. open": "58.9", "2. high": "59.8", "3. low": "58.7",
                "4. close": "59.44", "5. adjusted close": "58.55",
                "6. volume": "64000000", "7. dividend amount": "0.0000"
            }
        }
    }"#;

    #[test]
    fn test_parse_sorted_quotes() {
        let quotes = parse_weekly_response(SAMPLE).unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(quotes[0].adjusted_close, dec!(58.55));
        assert_eq!(quotes[1].close, dec!(60.00));
        assert_eq!(quotes[1].volume, 71234500);
    }

    #[test]
    fn test_api_error_message() {
        let err = parse_weekly_response(r#"{"Error Message": "Invalid API call"}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid API call"));
    }

    #[test]
    fn test_rate_limit_note() {
        let err = parse_weekly_response(r#"{"Note": "5 calls per minute"}"#).unwrap_err();
        assert!(err.to_string().contains("Rate limit"));

        let err = parse_weekly_response(r#"{"Information": "daily limit"}"#).unwrap_err();
        assert!(err.to_string().contains("Rate limit"));
    }

    #[test]
    fn test_empty_series() {
        assert!(parse_weekly_response(r#"{"Meta Data": {}}"#).is_err());
        assert!(parse_weekly_response(r#"{"Weekly Adjusted Time Series": {}}"#).is_err());
    }

    #[test]
    fn test_bad_price() {
        let body = r#"{"Weekly Adjusted Time Series": {
            "2024-01-05": {"4. close": "n/a", "5. adjusted close": "1"}
        }}"#;
        assert!(parse_weekly_response(body).is_err());
    }
}
