// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: code {code}, msg: {msg}")]
    ApiError { code: i64, msg: String },
    #[error("Malformed kline field {field}: {value:?}")]
    MalformedField { field: &'static str, value: String },
    #[error("Malformed kline timestamp {field}: {millis}")]
    MalformedTimestamp { field: &'static str, millis: i64 },
    #[error("No market data returned for {symbol}")]
    EmptySeries { symbol: String },
    #[error("Corrupt candle sequence from exchange: {0}")]
    CorruptSeries(#[from] core_types::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
