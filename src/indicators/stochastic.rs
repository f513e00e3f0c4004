//! Stochastic oscillator.
//!
//! %K = (close - lowest_low) / (highest_high - lowest_low) * 100 over the
//! trailing k_period window, with 50 as the defined fallback for a
//! zero-width range. %D = simple mean of the trailing d_period %K values
//! once enough exist.

use super::Series;
use crate::domain::Candle;
use serde::{Deserialize, Serialize};

/// %K and %D series, index-aligned with the input candles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticSeries {
    pub k: Series,
    pub d: Series,
}

/// Stochastic oscillator over a candle series.
///
/// # Panics
/// Panics if either period is zero.
pub fn stochastic(candles: &[Candle], k_period: usize, d_period: usize) -> StochasticSeries {
    assert!(k_period >= 1 && d_period >= 1, "Stochastic periods must be >= 1");
    let n = candles.len();
    let mut k: Series = vec![None; n];
    let mut d: Series = vec![None; n];

    for i in (k_period - 1)..n {
        let window = &candles[i + 1 - k_period..=i];
        let lo = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let hi = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        k[i] = Some(if hi == lo {
            50.0
        } else {
            (candles[i].close - lo) / (hi - lo) * 100.0
        });
    }

    for i in (k_period + d_period - 2)..n {
        let window = &k[i + 1 - d_period..=i];
        if window.iter().all(Option::is_some) {
            d[i] = Some(window.iter().flatten().sum::<f64>() / d_period as f64);
        }
    }

    StochasticSeries { k, d }
}
