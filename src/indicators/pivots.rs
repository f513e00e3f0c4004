//! Classic pivot points from recent price context.
//!
//! Computed from the most recent `window` candles (or all candles if
//! fewer): PP = (H + L + C) / 3 with two support and two resistance
//! levels from the standard formula. The risk engine snaps ATR stops to
//! these levels when one is nearby.

use crate::domain::Candle;
use serde::{Deserialize, Serialize};

/// Classic pivot levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotLevels {
    pub pp: f64,
    pub r1: f64,
    pub r2: f64,
    pub s1: f64,
    pub s2: f64,
}

impl PivotLevels {
    /// Levels in the order the risk engine scans them for stop snapping.
    pub fn scan_order(&self) -> [f64; 5] {
        [self.s1, self.s2, self.r1, self.r2, self.pp]
    }
}

/// Pivot points over the trailing `window` candles.
///
/// # Panics
/// Panics if `candles` is empty or `window` is zero.
pub fn pivot_points(candles: &[Candle], window: usize) -> PivotLevels {
    assert!(!candles.is_empty(), "pivot points need at least one candle");
    assert!(window >= 1, "pivot window must be >= 1");

    let start = candles.len().saturating_sub(window);
    let recent = &candles[start..];
    let h = recent.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let l = recent.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let c = recent.last().map(|c| c.close).unwrap_or_default();

    let pp = (h + l + c) / 3.0;
    PivotLevels {
        pp,
        r1: 2.0 * pp - l,
        r2: pp + h - l,
        s1: 2.0 * pp - h,
        s2: pp - h + l,
    }
}
