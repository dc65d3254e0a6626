// In crates/analysis/src/indicators.rs

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Trailing simple moving average over `window` samples.
///
/// The result is aligned 1:1 with the input; positions before the first
/// full window carry `None`. All arithmetic is in `Decimal`, so a flat
/// input produces exactly equal averages at every defined position.
pub fn sma(closes: &[Decimal], window: usize) -> Vec<Option<Decimal>> {
    assert!(window > 0, "SMA window must be at least 1");

    let mut out = Vec::with_capacity(closes.len());
    let mut sum = Decimal::ZERO;
    for (i, close) in closes.iter().enumerate() {
        sum += close;
        if i >= window {
            sum -= closes[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / Decimal::from(window)));
        } else {
            out.push(None);
        }
    }
    out
}

/// Trailing RSI-style momentum oscillator over `window` close-to-close
/// deltas, bounded to 0..=100.
///
/// Each defined position is `100 - 100 / (1 + avg_gain / avg_loss)` where
/// `avg_gain` and `avg_loss` are the plain means of the positive and
/// (absolute) negative deltas in the trailing window. An `avg_loss` of
/// zero short-circuits to exactly 100, which also covers the all-flat
/// window where both averages are zero.
pub fn momentum(closes: &[Decimal], window: usize) -> Vec<Option<Decimal>> {
    assert!(window > 0, "momentum window must be at least 1");

    let mut out = Vec::with_capacity(closes.len());
    let mut gains = Decimal::ZERO;
    let mut losses = Decimal::ZERO;
    for i in 0..closes.len() {
        if i == 0 {
            out.push(None);
            continue;
        }

        let delta = closes[i] - closes[i - 1];
        if delta > Decimal::ZERO {
            gains += delta;
        } else {
            losses -= delta;
        }
        // Retire the delta that just left the trailing window.
        if i > window {
            let old = closes[i - window] - closes[i - window - 1];
            if old > Decimal::ZERO {
                gains -= old;
            } else {
                losses += old;
            }
        }

        if i < window {
            out.push(None);
            continue;
        }

        let avg_gain = gains / Decimal::from(window);
        let avg_loss = losses / Decimal::from(window);
        let value = if avg_loss.is_zero() {
            dec!(100)
        } else {
            let rs = avg_gain / avg_loss;
            dec!(100) - dec!(100) / (Decimal::ONE + rs)
        };
        out.push(Some(value));
    }
    out
}

/// The per-candle indicator arrays for one analysis invocation, each
/// aligned 1:1 with the input series.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub short_ma: Vec<Option<Decimal>>,
    pub long_ma: Vec<Option<Decimal>>,
    pub momentum: Vec<Option<Decimal>>,
}

impl IndicatorFrame {
    pub fn compute(
        closes: &[Decimal],
        short_window: usize,
        long_window: usize,
        momentum_window: usize,
    ) -> Self {
        Self {
            short_ma: sma(closes, short_window),
            long_ma: sma(closes, long_window),
            momentum: momentum(closes, momentum_window),
        }
    }

    /// The most recent value of each array, if every array is defined at
    /// the last position.
    pub fn latest(&self) -> Option<(Decimal, Decimal, Decimal)> {
        let short = self.short_ma.last().copied().flatten()?;
        let long = self.long_ma.last().copied().flatten()?;
        let momentum = self.momentum.last().copied().flatten()?;
        Some((short, long, momentum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimals(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|&v| Decimal::from(v)).collect()
    }

    #[test]
    fn sma_is_undefined_until_the_window_fills() {
        let closes = decimals(&[1, 2, 3, 4, 5]);
        let result = sma(&closes, 3);
        assert_eq!(
            result,
            vec![None, None, Some(dec!(2)), Some(dec!(3)), Some(dec!(4))]
        );
    }

    #[test]
    fn sma_window_of_one_tracks_the_closes() {
        let closes = decimals(&[7, 8, 9]);
        let result = sma(&closes, 1);
        assert_eq!(result, vec![Some(dec!(7)), Some(dec!(8)), Some(dec!(9))]);
    }

    #[test]
    fn sma_on_short_input_is_all_undefined() {
        let closes = decimals(&[1, 2]);
        assert_eq!(sma(&closes, 3), vec![None, None]);
    }

    #[test]
    fn momentum_needs_a_full_window_of_deltas() {
        // window 14 over 15 closes: exactly one defined position.
        let closes: Vec<Decimal> = (1..=15).map(Decimal::from).collect();
        let result = momentum(&closes, 14);
        assert_eq!(result.len(), 15);
        assert!(result[..14].iter().all(Option::is_none));
        assert_eq!(result[14], Some(dec!(100)));
    }

    #[test]
    fn momentum_is_exactly_100_when_there_are_no_losses() {
        let closes: Vec<Decimal> = (1..=30).map(Decimal::from).collect();
        let result = momentum(&closes, 14);
        for value in &result[14..] {
            assert_eq!(*value, Some(dec!(100)));
        }
    }

    #[test]
    fn momentum_is_zero_on_a_straight_decline() {
        let closes: Vec<Decimal> = (1..=30).rev().map(Decimal::from).collect();
        let result = momentum(&closes, 14);
        for value in &result[14..] {
            assert_eq!(*value, Some(dec!(0)));
        }
    }

    #[test]
    fn momentum_on_a_flat_series_is_defined_without_dividing() {
        let closes = vec![dec!(42); 20];
        let result = momentum(&closes, 14);
        // Zero movement in both directions still yields a value.
        assert_eq!(result[19], Some(dec!(100)));
    }

    #[test]
    fn momentum_balances_equal_gains_and_losses_at_fifty() {
        // Alternating +1/-1 deltas: avg_gain == avg_loss, so rs == 1.
        let closes: Vec<Decimal> =
            (0..30).map(|i| if i % 2 == 0 { dec!(10) } else { dec!(11) }).collect();
        let result = momentum(&closes, 14);
        assert_eq!(result[29], Some(dec!(50)));
    }

    #[test]
    fn frame_arrays_stay_aligned_with_the_input() {
        let closes: Vec<Decimal> = (1..=250).map(Decimal::from).collect();
        let frame = IndicatorFrame::compute(&closes, 50, 200, 14);
        assert_eq!(frame.short_ma.len(), 250);
        assert_eq!(frame.long_ma.len(), 250);
        assert_eq!(frame.momentum.len(), 250);
        assert!(frame.long_ma[198].is_none());
        assert!(frame.long_ma[199].is_some());
    }
}
