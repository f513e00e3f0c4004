//! Volume indicators: relative volume and On-Balance Volume.
//!
//! Relative volume = volume / SMA(volume, period), unavailable while the
//! average is warming up or when it is zero. OBV is a running signed
//! accumulator (+volume on an up close, -volume on a down close, flat
//! otherwise) and is total from the first candle; a zero OBV is a
//! legitimate value, not "unavailable". OBV carries its own EMA for
//! trend comparison.

use super::ema::ema;
use super::sma::sma;
use super::Series;
use crate::domain::Candle;
use serde::{Deserialize, Serialize};

/// Relative volume, OBV, OBV EMA, and the average-volume series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSeries {
    pub rel_volume: Series,
    pub obv: Vec<f64>,
    pub obv_ema: Series,
    pub avg_volume: Series,
}

/// Volume indicators over a candle series.
///
/// # Panics
/// Panics if either period is zero.
pub fn volume_indicators(
    candles: &[Candle],
    period: usize,
    obv_ema_period: usize,
) -> VolumeSeries {
    assert!(period >= 1 && obv_ema_period >= 1, "volume periods must be >= 1");
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
    let avg_volume = sma(&volumes, period);

    let rel_volume: Series = volumes
        .iter()
        .zip(&avg_volume)
        .map(|(&v, avg)| match avg {
            Some(a) if *a > 0.0 => Some(v / a),
            _ => None,
        })
        .collect();

    let mut obv = vec![0.0; candles.len()];
    for i in 1..candles.len() {
        let dir = if candles[i].close > candles[i - 1].close {
            1.0
        } else if candles[i].close < candles[i - 1].close {
            -1.0
        } else {
            0.0
        };
        obv[i] = obv[i - 1] + dir * candles[i].volume;
    }
    let obv_ema = ema(&obv, obv_ema_period);

    VolumeSeries { rel_volume, obv, obv_ema, avg_volume }
}
