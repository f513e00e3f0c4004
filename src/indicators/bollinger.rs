//! Bollinger Bands and %B.
//!
//! Middle = SMA(period); bands = middle +/- mult * population stddev over
//! the same window. %B = (close - lower) / (upper - lower), unavailable
//! when the band has zero width (flat window).

use super::sma::sma;
use super::Series;
use serde::{Deserialize, Serialize};

/// Upper/middle/lower bands plus %B, index-aligned with the input closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerSeries {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
    pub pct_b: Series,
}

/// Bollinger Bands over a close series.
///
/// # Panics
/// Panics if `period` is zero.
pub fn bollinger_bands(closes: &[f64], period: usize, mult: f64) -> BollingerSeries {
    assert!(period >= 1, "Bollinger period must be >= 1");
    let n = closes.len();
    let middle = sma(closes, period);
    let mut upper: Series = vec![None; n];
    let mut lower: Series = vec![None; n];
    let mut pct_b: Series = vec![None; n];

    for i in 0..n {
        let Some(mid) = middle[i] else { continue };
        let window = &closes[i + 1 - period..=i];
        let variance = window.iter().map(|v| (v - mid).powi(2)).sum::<f64>() / period as f64;
        let sd = variance.sqrt();
        let up = mid + mult * sd;
        let lo = mid - mult * sd;
        upper[i] = Some(up);
        lower[i] = Some(lo);
        // Zero-width band: %B would divide by zero, so it stays unavailable.
        if up > lo {
            pct_b[i] = Some((closes[i] - lo) / (up - lo));
        }
    }

    BollingerSeries { upper, middle, lower, pct_b }
}
