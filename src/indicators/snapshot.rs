//! Snapshot of last-available indicator values.
//!
//! The scoring and risk engines only ever look at the most recent
//! available value of each series (plus the previous histogram value for
//! delta comparison), so the snapshot collapses the aligned series into
//! one flat struct. "Last available" skips trailing `None`s: a series
//! still warming up contributes `None` and its factor is skipped.

use super::{BollingerSeries, MacdSeries, Series, StochasticSeries, VolumeSeries};
use crate::domain::Candle;
use serde::{Deserialize, Serialize};

/// Most recent available value of every series, plus context from the
/// last candle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ema_short: Option<f64>,
    pub ema_medium: Option<f64>,
    pub ema_long: Option<f64>,
    pub ema_trend: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    /// Second-most-recent available histogram value, for zero-cross and
    /// expansion checks.
    pub macd_hist_prev: Option<f64>,
    pub atr: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub pct_b: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub rel_volume: Option<f64>,
    /// OBV is total from the first candle; zero is a legitimate value.
    pub obv: f64,
    pub obv_ema: Option<f64>,
    pub close: f64,
    pub prev_close: Option<f64>,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
}

impl IndicatorSnapshot {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn from_series(
        candles: &[Candle],
        ema_short: &Series,
        ema_medium: &Series,
        ema_long: &Series,
        ema_trend: &Series,
        rsi: &Series,
        macd: &MacdSeries,
        atr: &Series,
        bollinger: &BollingerSeries,
        stochastic: &StochasticSeries,
        volume: &VolumeSeries,
    ) -> Self {
        let last = candles.last().expect("candle series must not be empty");
        let prev_close = candles.len().checked_sub(2).map(|i| candles[i].close);
        Self {
            ema_short: last_value(ema_short),
            ema_medium: last_value(ema_medium),
            ema_long: last_value(ema_long),
            ema_trend: last_value(ema_trend),
            rsi: last_value(rsi),
            macd_line: last_value(&macd.line),
            macd_signal: last_value(&macd.signal),
            macd_hist: last_value(&macd.histogram),
            macd_hist_prev: prev_value(&macd.histogram, 1),
            atr: last_value(atr),
            bb_upper: last_value(&bollinger.upper),
            bb_middle: last_value(&bollinger.middle),
            bb_lower: last_value(&bollinger.lower),
            pct_b: last_value(&bollinger.pct_b),
            stoch_k: last_value(&stochastic.k),
            stoch_d: last_value(&stochastic.d),
            rel_volume: last_value(&volume.rel_volume),
            obv: volume.obv.last().copied().unwrap_or(0.0),
            obv_ema: last_value(&volume.obv_ema),
            close: last.close,
            prev_close,
            high: last.high,
            low: last.low,
            volume: last.volume,
        }
    }
}

/// Most recent available value of a series.
pub fn last_value(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().flatten().copied().next()
}

/// The `offset`-th most recent available value (offset 0 = last).
pub fn prev_value(series: &[Option<f64>], offset: usize) -> Option<f64> {
    series.iter().rev().flatten().copied().nth(offset)
}
