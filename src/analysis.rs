//! Full analysis pipeline: candles in, decision out.
//!
//! Runs the indicator set, scores it, and, when the score resolves to a
//! tradeable direction with a live quote, attaches a sized trade plan.
//! This is the one seam where history length is enforced; the indicator
//! layer itself tolerates any non-empty series.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{AccountSettings, Candle, OpenPosition, Quote};
use crate::exit::{check_exit, ExitVerdict};
use crate::indicators::{compute, IndicatorSet};
use crate::risk::{plan_trade, TradePlan};
use crate::signal::{score, Signal};

/// Minimum candle history for a meaningful score.
pub const MIN_BARS: usize = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("candle series is empty")]
    EmptySeries,
    #[error("insufficient history: got {got} bars, need {need}")]
    InsufficientHistory { got: usize, need: usize },
}

/// Everything produced for one symbol at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub indicators: IndicatorSet,
    pub signal: Signal,
    /// Present only for a BUY/SELL with a live quote and available ATR.
    pub plan: Option<TradePlan>,
}

/// Run the full pipeline over a candle history.
///
/// The quote supplies the execution price for sizing; without one the
/// signal is still produced but no plan is attached.
pub fn analyze(
    candles: &[Candle],
    symbol: &str,
    quote: Option<&Quote>,
    settings: &AccountSettings,
    now: DateTime<Utc>,
) -> Result<Analysis, AnalysisError> {
    if candles.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    if candles.len() < MIN_BARS {
        return Err(AnalysisError::InsufficientHistory { got: candles.len(), need: MIN_BARS });
    }

    let indicators = compute(candles);
    let signal = score(&indicators.snapshot, symbol, quote, now);

    let plan = match (signal.direction.side(), quote) {
        (Some(side), Some(q)) => plan_trade(
            settings,
            side,
            symbol,
            q.price,
            indicators.snapshot.atr,
            Some(&indicators.pivots),
        ),
        _ => None,
    };

    Ok(Analysis { indicators, signal, plan })
}

/// Exit evaluation for an open position against the freshest data.
pub fn check_open_position(
    position: &OpenPosition,
    quote: &Quote,
    indicators: &IndicatorSet,
) -> ExitVerdict {
    check_exit(position, quote.price, &indicators.snapshot)
}
