//! Relative Strength Index (Wilder smoothing).
//!
//! Seed average gain/loss: simple mean of the first `period` deltas.
//! Thereafter: avg = (prev_avg * (period - 1) + current) / period,
//! separately for gains and losses.
//! RSI = 100 when average loss is 0, else 100 - 100 / (1 + avg_gain / avg_loss).
//! Warm-up: indices below `period` are unavailable (deltas start at index 1).

use super::Series;

/// RSI over a close series.
///
/// # Panics
/// Panics if `period` is zero.
pub fn rsi(closes: &[f64], period: usize) -> Series {
    assert!(period >= 1, "RSI period must be >= 1");
    let n = closes.len();
    let mut result: Series = vec![None; n];
    if n < period + 1 {
        return result;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let d = closes[i] - closes[i - 1];
        if d > 0.0 {
            gains += d;
        } else {
            losses -= d;
        }
    }
    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;
    result[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in (period + 1)..n {
        let d = closes[i] - closes[i - 1];
        avg_gain = (avg_gain * (period as f64 - 1.0) + d.max(0.0)) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + (-d).max(0.0)) / period as f64;
        result[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    result
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
