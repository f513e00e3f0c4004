//! Open-position exit monitor.
//!
//! Checks run in strict priority order and short-circuit at the first
//! hit: stop breach, target reach, RSI extreme against the position,
//! MACD histogram flipping sign against the position. A verdict always
//! carries the unrealized P&L even when no exit fires.

use serde::{Deserialize, Serialize};

use crate::domain::{OpenPosition, TradeSide};
use crate::indicators::IndicatorSnapshot;

/// RSI level treated as overbought for a long position.
const RSI_EXIT_HIGH: f64 = 75.0;
/// RSI level treated as oversold for a short position.
const RSI_EXIT_LOW: f64 = 25.0;

/// Outcome of one exit evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitVerdict {
    pub should_exit: bool,
    pub reasons: Vec<String>,
    /// Unrealized P&L as a percentage of entry, sign-adjusted for side.
    pub unrealized_pnl_pct: f64,
}

/// Evaluate exit conditions for an open position at the current price.
pub fn check_exit(
    position: &OpenPosition,
    current_price: f64,
    snap: &IndicatorSnapshot,
) -> ExitVerdict {
    let raw_pnl = (current_price - position.entry_price) / position.entry_price * 100.0;
    let pnl_pct = if position.side.is_long() { raw_pnl } else { -raw_pnl };

    let stop_breached = match position.side {
        TradeSide::Buy => current_price <= position.stop_price,
        TradeSide::Sell => current_price >= position.stop_price,
    };
    if stop_breached {
        return ExitVerdict {
            should_exit: true,
            reasons: vec![format!(
                "Stop loss hit at {:.2} ({:.2}% loss)",
                position.stop_price,
                pnl_pct.abs()
            )],
            unrealized_pnl_pct: round2(pnl_pct),
        };
    }

    let target_reached = match position.side {
        TradeSide::Buy => current_price >= position.target_price,
        TradeSide::Sell => current_price <= position.target_price,
    };
    if target_reached {
        return ExitVerdict {
            should_exit: true,
            reasons: vec![format!(
                "Target reached at {:.2} (+{:.2}% gain)",
                position.target_price, pnl_pct
            )],
            unrealized_pnl_pct: round2(pnl_pct),
        };
    }

    if let Some(rsi) = snap.rsi {
        let extreme = if position.side.is_long() {
            rsi > RSI_EXIT_HIGH
        } else {
            rsi < RSI_EXIT_LOW
        };
        if extreme {
            let label = if position.side.is_long() { "overbought" } else { "oversold" };
            return ExitVerdict {
                should_exit: true,
                reasons: vec![format!("RSI {label} at {rsi:.1}: consider taking profit")],
                unrealized_pnl_pct: round2(pnl_pct),
            };
        }
    }

    if let (Some(hist), Some(prev)) = (snap.macd_hist, snap.macd_hist_prev) {
        let crossed_against = if position.side.is_long() {
            hist < 0.0 && prev >= 0.0
        } else {
            hist > 0.0 && prev <= 0.0
        };
        if crossed_against {
            return ExitVerdict {
                should_exit: true,
                reasons: vec!["MACD momentum turned against the position".to_string()],
                unrealized_pnl_pct: round2(pnl_pct),
            };
        }
    }

    ExitVerdict {
        should_exit: false,
        reasons: Vec::new(),
        unrealized_pnl_pct: round2(pnl_pct),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
