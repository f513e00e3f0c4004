//! Simple moving average.
//!
//! Arithmetic mean of the trailing window.
//! Warm-up: indices below period - 1 are unavailable.

use super::Series;

/// SMA over a raw value series (closes, volumes, ...).
///
/// # Panics
/// Panics if `period` is zero.
pub fn sma(values: &[f64], period: usize) -> Series {
    assert!(period >= 1, "SMA period must be >= 1");
    let n = values.len();
    let mut result: Series = vec![None; n];
    if n < period {
        return result;
    }

    // Rolling sum: O(n) instead of re-summing each window.
    let mut sum: f64 = values[..period].iter().sum();
    result[period - 1] = Some(sum / period as f64);
    for i in period..n {
        sum += values[i] - values[i - period];
        result[i] = Some(sum / period as f64);
    }
    result
}
