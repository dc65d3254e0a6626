// In crates/analysis/src/lib.rs

use core_types::{CandleSeries, Signal, SignalAction};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub mod error;
pub mod indicators;

// Re-export public types
pub use error::{Error, Result};
pub use indicators::IndicatorFrame;

/// Trailing window of the short moving average.
pub const SHORT_WINDOW: usize = 50;
/// Trailing window of the long moving average.
pub const LONG_WINDOW: usize = 200;
/// Trailing window of the momentum oscillator.
pub const MOMENTUM_WINDOW: usize = 14;

/// Classifies a candle series into a trading signal.
///
/// Pure and deterministic: the same series always yields the same signal,
/// and nothing outside the series is consulted.
///
/// The three indicators must all be defined at the most recent candle;
/// otherwise the series is too short for a meaningful verdict and
/// `Error::InsufficientHistory` is returned instead of a signal computed
/// on absent values.
pub fn analyze(series: &CandleSeries) -> Result<Signal> {
    let closes = series.closes();
    let frame = IndicatorFrame::compute(&closes, SHORT_WINDOW, LONG_WINDOW, MOMENTUM_WINDOW);

    let Some((short_ma, long_ma, momentum)) = frame.latest() else {
        return Err(Error::InsufficientHistory { required: LONG_WINDOW, have: series.len() });
    };

    Ok(classify(short_ma, long_ma, momentum))
}

/// The decision table. Evaluated top to bottom, first match wins.
fn classify(short_ma: Decimal, long_ma: Decimal, momentum: Decimal) -> Signal {
    if short_ma > long_ma {
        // Uptrend
        if momentum < dec!(30) {
            Signal {
                action: SignalAction::Buy,
                rationale: "Trend is Up, momentum confirms oversold reversal",
            }
        } else {
            Signal { action: SignalAction::Buy, rationale: "Trend is Up" }
        }
    } else if short_ma < long_ma {
        // Downtrend
        if momentum > dec!(70) {
            Signal {
                action: SignalAction::Sell,
                rationale: "Trend is Down, momentum confirms overbought reversal",
            }
        } else {
            Signal { action: SignalAction::Sell, rationale: "Trend is Down" }
        }
    } else {
        Signal { action: SignalAction::Hold, rationale: "No clear trend" }
    }
}
