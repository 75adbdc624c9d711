//! Daily closing prices from an Alpha Vantage style REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::types::quote::{PricePoint, QuoteSeries};

const SERIES_KEY: &str = "Time Series (Daily)";
const CLOSE_KEY: &str = "4. close";
/// Keys the provider uses in place of a series when it refuses a request.
const NOTICE_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("quote provider returned HTTP {0}")]
    Status(u16),
    #[error("no data available for symbol {0}")]
    NoData(String),
    #[error("could not decode quote response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Daily closes for `symbol`, ascending by date.
    async fn daily_series(&self, symbol: &str) -> Result<QuoteSeries, QuoteError>;
}

#[derive(Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, QuoteError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantageClient {
    async fn daily_series(&self, symbol: &str) -> Result<QuoteSeries, QuoteError> {
        debug!(symbol, "fetching daily series");
        let res = self
            .http
            .get(format!("{}/query", self.base_url))
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            error!(symbol, status = status.as_u16(), "quote provider rejected request");
            return Err(QuoteError::Status(status.as_u16()));
        }

        let body: Value = res.json().await?;
        parse_daily_series(symbol, &body)
    }
}

/// Parse a `TIME_SERIES_DAILY` response body. Only the closing price is read.
pub fn parse_daily_series(symbol: &str, body: &Value) -> Result<QuoteSeries, QuoteError> {
    let Some(series) = body.get(SERIES_KEY).and_then(Value::as_object) else {
        if let Some(notice) = NOTICE_KEYS.iter().find_map(|k| body.get(*k)) {
            debug!(symbol, %notice, "provider returned a notice instead of data");
        }
        return Err(QuoteError::NoData(symbol.to_string()));
    };

    let mut points = Vec::with_capacity(series.len());
    for (date, fields) in series {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| QuoteError::Decode(format!("bad date '{date}': {e}")))?;
        let close = fields
            .get(CLOSE_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| QuoteError::Decode(format!("missing close for {date}")))?;
        let close: f64 = close
            .parse()
            .map_err(|e| QuoteError::Decode(format!("bad close '{close}' for {date}: {e}")))?;
        points.push(PricePoint { date, close });
    }

    if points.is_empty() {
        return Err(QuoteError::NoData(symbol.to_string()));
    }
    Ok(QuoteSeries::new(symbol, points))
}
