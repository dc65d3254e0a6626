// In crates/core-types/src/types.rs

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trading pair symbol as the exchange defines it (e.g., "BTCUSDT").
///
/// The value is opaque to us; the exchange is the authority on which
/// symbols exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One closed candlestick: the OHLCV summary of a single interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// The instant the interval opened.
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    /// The instant the interval closed.
    pub close_time: DateTime<Utc>,
}

/// An ordered run of candles, oldest first.
///
/// Construction validates that `open_time` is strictly ascending; a
/// duplicate or out-of-order candle means the upstream feed handed us
/// corrupt data, and the whole sequence is rejected rather than analyzed.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries(Vec<Candle>);

impl CandleSeries {
    pub fn try_new(candles: Vec<Candle>) -> Result<Self> {
        for (i, pair) in candles.windows(2).enumerate() {
            if pair[1].open_time <= pair[0].open_time {
                return Err(Error::UnorderedCandles { index: i + 1 });
            }
        }
        Ok(Self(candles))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.0
    }

    pub fn last(&self) -> Option<&Candle> {
        self.0.last()
    }

    /// The closing price of every candle, in series order.
    pub fn closes(&self) -> Vec<Decimal> {
        self.0.iter().map(|c| c.close).collect()
    }
}

/// The discrete verdict of a market analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            SignalAction::Buy => "BUY",
            SignalAction::Sell => "SELL",
            SignalAction::Hold => "HOLD",
        };
        write!(f, "{tag}")
    }
}

/// A classified trading signal plus the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub action: SignalAction,
    /// Human-readable description of which decision rule fired.
    pub rationale: &'static str,
}

impl Signal {
    /// The wire form of the signal, e.g. `BUY (Trend is Up)`.
    pub fn prediction(&self) -> String {
        format!("{} ({})", self.action, self.rationale)
    }
}
