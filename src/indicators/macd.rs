//! Moving Average Convergence Divergence.
//!
//! Line = EMA(fast) - EMA(slow) wherever both are available.
//! Signal = EMA(signal_period) applied to the compacted (None-stripped)
//! line, then re-aligned to the original indices.
//! Histogram = line - signal where both exist.

use super::ema::ema;
use super::Series;
use serde::{Deserialize, Serialize};

/// The three MACD series, index-aligned with the input closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub line: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// MACD over a close series.
///
/// # Panics
/// Panics if any period is zero.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    assert!(fast >= 1 && slow >= 1 && signal_period >= 1, "MACD periods must be >= 1");
    let n = closes.len();
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let line: Series = (0..n)
        .map(|i| match (fast_ema[i], slow_ema[i]) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    // The signal EMA runs over the compacted line so its own warm-up
    // counts only available MACD values, then lands back on the original
    // indices.
    let compact: Vec<f64> = line.iter().flatten().copied().collect();
    let compact_indices: Vec<usize> = line
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|_| i))
        .collect();
    let signal_compact = ema(&compact, signal_period);

    let mut signal: Series = vec![None; n];
    let mut histogram: Series = vec![None; n];
    for (j, &i) in compact_indices.iter().enumerate() {
        signal[i] = signal_compact[j];
        if let (Some(line_v), Some(sig_v)) = (line[i], signal_compact[j]) {
            histogram[i] = Some(line_v - sig_v);
        }
    }

    MacdSeries { line, signal, histogram }
}
