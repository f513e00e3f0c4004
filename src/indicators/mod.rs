//! Technical indicator library.
//!
//! Pure numeric transforms over a candle series. Every indicator returns a
//! series index-aligned with the input candles; positions before the warm-up
//! period hold `None` rather than zero, so "unavailable" is structurally
//! distinguishable from a legitimate zero value.
//!
//! [`compute`] runs the full default set and assembles the
//! [`IndicatorSnapshot`] of last-available values consumed by the signal
//! and risk engines. Recomputation is total: no incremental state is
//! carried between calls, so two calls over the same candles yield
//! identical output.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod pivots;
pub mod rsi;
pub mod sma;
pub mod snapshot;
pub mod stochastic;
pub mod volume;

pub use atr::atr;
pub use bollinger::{bollinger_bands, BollingerSeries};
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use pivots::{pivot_points, PivotLevels};
pub use rsi::rsi;
pub use sma::sma;
pub use snapshot::IndicatorSnapshot;
pub use stochastic::{stochastic, StochasticSeries};
pub use volume::{volume_indicators, VolumeSeries};

use crate::domain::Candle;
use serde::{Deserialize, Serialize};

/// Indicator series aligned index-for-index with the input candles.
/// `None` marks the warm-up region (or a degenerate window, e.g. a
/// zero-width Bollinger band).
pub type Series = Vec<Option<f64>>;

/// Periods for the full indicator set.
///
/// The defaults are the parameter set the scoring engine is calibrated
/// against; override only for research use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub ema_short: usize,
    pub ema_medium: usize,
    pub ema_long: usize,
    pub ema_trend: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub atr_period: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
    pub stoch_k_period: usize,
    pub stoch_d_period: usize,
    pub volume_period: usize,
    pub obv_ema_period: usize,
    pub pivot_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_short: 9,
            ema_medium: 21,
            ema_long: 50,
            ema_trend: 200,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            atr_period: 14,
            bollinger_period: 20,
            bollinger_mult: 2.0,
            stoch_k_period: 14,
            stoch_d_period: 3,
            volume_period: 20,
            obv_ema_period: 10,
            pivot_window: 30,
        }
    }
}

/// All derived series for one candle history, plus the snapshot of
/// last-available values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub ema_short: Series,
    pub ema_medium: Series,
    pub ema_long: Series,
    pub ema_trend: Series,
    pub rsi: Series,
    pub macd: MacdSeries,
    pub atr: Series,
    pub bollinger: BollingerSeries,
    pub stochastic: StochasticSeries,
    pub volume: VolumeSeries,
    pub pivots: PivotLevels,
    pub snapshot: IndicatorSnapshot,
}

/// Compute the full default indicator set.
///
/// Pure and total for `candles.len() >= 1`: short history yields series
/// that are simply `None` until their warm-up completes, never an error.
/// This lets the signal engine skip unready factors individually instead
/// of refusing output.
///
/// # Panics
/// Panics if `candles` is empty.
pub fn compute(candles: &[Candle]) -> IndicatorSet {
    compute_with(&IndicatorParams::default(), candles)
}

/// Compute the full indicator set with explicit periods.
pub fn compute_with(params: &IndicatorParams, candles: &[Candle]) -> IndicatorSet {
    assert!(!candles.is_empty(), "candle series must not be empty");

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let ema_short = ema(&closes, params.ema_short);
    let ema_medium = ema(&closes, params.ema_medium);
    let ema_long = ema(&closes, params.ema_long);
    let ema_trend = ema(&closes, params.ema_trend);
    let rsi = rsi(&closes, params.rsi_period);
    let macd = macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
    let atr = atr(candles, params.atr_period);
    let bollinger = bollinger_bands(&closes, params.bollinger_period, params.bollinger_mult);
    let stochastic = stochastic(candles, params.stoch_k_period, params.stoch_d_period);
    let volume = volume_indicators(candles, params.volume_period, params.obv_ema_period);
    let pivots = pivot_points(candles, params.pivot_window);

    let snapshot = IndicatorSnapshot::from_series(
        candles, &ema_short, &ema_medium, &ema_long, &ema_trend, &rsi, &macd, &atr, &bollinger,
        &stochastic, &volume,
    );

    IndicatorSet {
        ema_short,
        ema_medium,
        ema_long,
        ema_trend,
        rsi,
        macd,
        atr,
        bollinger,
        stochastic,
        volume,
        pivots,
        snapshot,
    }
}

/// Create synthetic candles from close prices for testing.
///
/// Generates plausible OHLV: open = prev close (or close for the first
/// candle), high = max(open, close) + 1.0, low = min(open, close) - 1.0,
/// volume = 1000, timestamps spaced 15 minutes apart.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    const FIFTEEN_MIN_MS: i64 = 15 * 60 * 1000;
    let base_ts = 1_700_000_000_000_i64;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base_ts + i as i64 * FIFTEEN_MIN_MS,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_handles_single_candle() {
        let candles = make_candles(&[100.0]);
        let set = compute(&candles);
        // Everything with warm-up > 1 is unavailable; nothing panics.
        assert_eq!(set.ema_short, vec![None]);
        assert_eq!(set.rsi, vec![None]);
        assert_eq!(set.snapshot.close, 100.0);
        assert_eq!(set.snapshot.prev_close, None);
        assert!(set.snapshot.rsi.is_none());
    }

    #[test]
    fn compute_is_idempotent() {
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + (i as f64 * 0.3).sin() * 4.0).collect();
        let candles = make_candles(&closes);
        let a = compute(&candles);
        let b = compute(&candles);
        assert_eq!(a, b);
    }

    #[test]
    fn all_series_are_aligned_with_input() {
        let candles = make_candles(&(0..80).map(|i| 100.0 + i as f64 * 0.2).collect::<Vec<_>>());
        let set = compute(&candles);
        let n = candles.len();
        assert_eq!(set.ema_trend.len(), n);
        assert_eq!(set.rsi.len(), n);
        assert_eq!(set.macd.line.len(), n);
        assert_eq!(set.macd.signal.len(), n);
        assert_eq!(set.macd.histogram.len(), n);
        assert_eq!(set.atr.len(), n);
        assert_eq!(set.bollinger.pct_b.len(), n);
        assert_eq!(set.stochastic.k.len(), n);
        assert_eq!(set.volume.rel_volume.len(), n);
        assert_eq!(set.volume.obv.len(), n);
    }

    #[test]
    #[should_panic(expected = "candle series must not be empty")]
    fn compute_rejects_empty_series() {
        compute(&[]);
    }
}
