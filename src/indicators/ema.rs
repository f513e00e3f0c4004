//! Exponential moving average.
//!
//! Seed: SMA over the first `period` values, placed at index period - 1.
//! Thereafter: v[i] = v[i-1] * (1 - k) + x[i] * k, with k = 2 / (period + 1).

use super::Series;

/// EMA over a raw value series.
///
/// # Panics
/// Panics if `period` is zero.
pub fn ema(values: &[f64], period: usize) -> Series {
    assert!(period >= 1, "EMA period must be >= 1");
    let n = values.len();
    let mut result: Series = vec![None; n];
    if n < period {
        return result;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = Some(seed);

    let mut prev = seed;
    for i in period..n {
        let v = values[i] * k + prev * (1.0 - k);
        result[i] = Some(v);
        prev = v;
    }
    result
}
