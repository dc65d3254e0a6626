// In crates/web-server/src/types.rs

use serde::{Deserialize, Serialize};

/// The body of `POST /analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// The trading pair to analyze (e.g., "BTCUSDT").
    pub symbol: String,
    // `serde(default = ...)` provides a default value if the field is missing.
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_lookback")]
    pub lookback_period: u16,
}

/// The successful response of `POST /analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub symbol: String,
    /// The signal tag plus its rationale, e.g. "BUY (Trend is Up)".
    pub prediction: String,
}

// Helper functions for serde defaults.
fn default_interval() -> String {
    "1m".to_string()
}
fn default_lookback() -> u16 {
    200
}
