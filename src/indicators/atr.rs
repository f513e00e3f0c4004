//! Average True Range (Wilder smoothing).
//!
//! True range = max(high - low, |high - prev_close|, |low - prev_close|);
//! the first candle uses high - low. First ATR is the simple mean of the
//! first `period` true ranges; thereafter
//! ATR[i] = (ATR[i-1] * (period - 1) + TR[i]) / period.

use super::Series;
use crate::domain::Candle;

/// ATR over a candle series.
///
/// # Panics
/// Panics if `period` is zero.
pub fn atr(candles: &[Candle], period: usize) -> Series {
    assert!(period >= 1, "ATR period must be >= 1");
    let n = candles.len();
    let mut result: Series = vec![None; n];
    if n < period {
        return result;
    }

    let tr: Vec<f64> = candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                c.high - c.low
            } else {
                let pc = candles[i - 1].close;
                (c.high - c.low).max((c.high - pc).abs()).max((c.low - pc).abs())
            }
        })
        .collect();

    let seed: f64 = tr[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = Some(seed);

    let mut prev = seed;
    for i in period..n {
        let v = (prev * (period as f64 - 1.0) + tr[i]) / period as f64;
        result[i] = Some(v);
        prev = v;
    }
    result
}
