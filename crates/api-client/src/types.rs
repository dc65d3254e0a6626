// In crates/api-client/src/types.rs

use reqwest::Client;
use serde::Deserialize;

/// The main client for interacting with the Binance Futures API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The persistent HTTP client, reused across requests.
    pub http_client: Client,
    /// The user's Binance API key, sent when configured for rate-limit
    /// accounting.
    pub api_key: String,
    /// The base URL for the Binance Futures API.
    pub base_url: String,
}

/// Temporary struct to deserialize the kline response from Binance,
/// which is a JSON array of mixed types.
#[derive(Debug, Deserialize)]
pub struct RawKline(
    pub i64,    // 0: Open time
    pub String, // 1: Open
    pub String, // 2: High
    pub String, // 3: Low
    pub String, // 4: Close
    pub String, // 5: Volume
    pub i64,    // 6: Close time
    pub String, // 7: Quote asset volume
    pub i64,    // 8: Number of trades
    pub String, // 9: Taker buy base asset volume
    pub String, // 10: Taker buy quote asset volume
    pub String, // 11: Ignore
);
