// In crates/api-client/src/lib.rs

use app_config::types::BinanceSettings;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use core_types::{Candle, CandleSeries, Symbol};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::{ApiClient, RawKline};

/// A source of historical candle data for a symbol.
///
/// The web layer and the CLI talk to this trait rather than to the
/// concrete client, so the analysis pipeline can be exercised against a
/// canned source in tests.
#[async_trait]
pub trait KlineSource: Send + Sync {
    /// Fetches the most recent `lookback` candles for `symbol` at
    /// `interval`, oldest first.
    ///
    /// Returns `Error::EmptySeries` when the venue has no data for the
    /// requested parameters, and `Error::CorruptSeries` when the rows it
    /// returned are not strictly ordered by open time.
    async fn fetch_series(
        &self,
        symbol: &Symbol,
        interval: &str,
        lookback: u16,
    ) -> Result<CandleSeries>;
}

impl ApiClient {
    /// Constructs a new ApiClient from BinanceSettings.
    pub fn new(settings: &BinanceSettings) -> Self {
        ApiClient {
            http_client: reqwest::Client::new(),
            api_key: settings.api_key.clone(),
            base_url: settings.rest_base_url.clone(),
        }
    }

    /// Fetches historical kline (candlestick) data.
    ///
    /// This corresponds to the `GET /fapi/v1/klines` endpoint.
    ///
    /// # Arguments
    ///
    /// * `symbol`: The symbol to fetch klines for.
    /// * `interval`: The kline interval (e.g., "1m", "5m", "1h").
    /// * `limit`: Number of most-recent klines to return (max 1500).
    pub async fn get_klines(
        &self,
        symbol: &Symbol,
        interval: &str,
        limit: u16,
    ) -> Result<Vec<Candle>> {
        let params = format!("symbol={}&interval={}&limit={}", symbol.0, interval, limit);
        let url = format!("{}/fapi/v1/klines?{}", self.base_url, params);

        let mut request = self.http_client.get(&url);
        // The klines endpoint is public; the key only buys rate-limit headroom.
        if !self.api_key.is_empty() {
            request = request.header("X-MBX-APIKEY", &self.api_key);
        }

        let response_body = request
            .send()
            .await
            .map_err(Error::RequestFailed)?
            .text()
            .await
            .map_err(Error::RequestFailed)?;

        // Deserialize the raw response into a vector of RawKline.
        let raw_klines: Vec<RawKline> = serde_json::from_str(&response_body).map_err(|e| {
            // If deserialization fails, it might be a Binance error object.
            if let Ok(value) = serde_json::from_str::<Value>(&response_body) {
                if let Some(code) = value.get("code").and_then(Value::as_i64) {
                    let msg = value.get("msg").and_then(Value::as_str).unwrap_or("").to_string();
                    return Error::ApiError { code, msg };
                }
            }
            Error::DeserializationFailed(e)
        })?;

        // Convert the RawKlines into our clean, internal Candle type.
        raw_klines.into_iter().map(convert_kline).collect()
    }
}

#[async_trait]
impl KlineSource for ApiClient {
    async fn fetch_series(
        &self,
        symbol: &Symbol,
        interval: &str,
        lookback: u16,
    ) -> Result<CandleSeries> {
        let candles = self.get_klines(symbol, interval, lookback).await?;
        tracing::debug!(symbol = %symbol, interval, count = candles.len(), "fetched klines");

        if candles.is_empty() {
            return Err(Error::EmptySeries { symbol: symbol.0.clone() });
        }

        Ok(CandleSeries::try_new(candles)?)
    }
}

/// Converts one raw exchange row into a `Candle`.
///
/// Binance sends prices and volumes as decimal strings; a field that does
/// not parse means the feed is broken, so the whole fetch fails rather
/// than defaulting the value.
fn convert_kline(raw: RawKline) -> Result<Candle> {
    Ok(Candle {
        open_time: parse_instant("open_time", raw.0)?,
        open: parse_decimal("open", &raw.1)?,
        high: parse_decimal("high", &raw.2)?,
        low: parse_decimal("low", &raw.3)?,
        close: parse_decimal("close", &raw.4)?,
        volume: parse_decimal("volume", &raw.5)?,
        close_time: parse_instant("close_time", raw.6)?,
    })
}

fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| Error::MalformedField { field, value: value.to_string() })
}

fn parse_instant(field: &'static str, millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(Error::MalformedTimestamp { field, millis })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw_kline(open_time: i64, close: &str) -> RawKline {
        RawKline(
            open_time,
            "100.0".to_string(),
            "101.5".to_string(),
            "99.5".to_string(),
            close.to_string(),
            "12.34".to_string(),
            open_time.saturating_add(59_999),
            "1234.5".to_string(),
            42,
            "6.0".to_string(),
            "600.0".to_string(),
            "0".to_string(),
        )
    }

    #[test]
    fn converts_a_well_formed_row() {
        let candle = convert_kline(raw_kline(1_700_000_000_000, "100.25")).unwrap();
        assert_eq!(candle.close, dec!(100.25));
        assert_eq!(candle.volume, dec!(12.34));
        assert_eq!(candle.open_time.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(candle.close_time.timestamp_millis(), 1_700_000_059_999);
    }

    #[test]
    fn rejects_an_unparseable_price() {
        let mut raw = raw_kline(1_700_000_000_000, "100.25");
        raw.4 = "not-a-number".to_string();
        let err = convert_kline(raw).unwrap_err();
        assert!(matches!(err, Error::MalformedField { field: "close", .. }));
    }

    #[test]
    fn rejects_an_out_of_range_timestamp() {
        let err = convert_kline(raw_kline(i64::MAX, "1.0")).unwrap_err();
        assert!(matches!(err, Error::MalformedTimestamp { field: "open_time", .. }));
    }
}
