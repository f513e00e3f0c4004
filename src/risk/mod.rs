//! Risk management and position sizing.
//!
//! Turns a direction plus volatility context into a concrete plan:
//! ATR-based stop (snapped to a nearby pivot level when one sits on the
//! protective side), risk-budget share count, commission-adjusted P&L
//! projections, and advisory warnings. All intermediate arithmetic runs
//! unrounded; rounding happens once at the output boundary.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountSettings, TradeSide};
use crate::indicators::PivotLevels;

/// Stop distance as a multiple of ATR.
const ATR_STOP_MULTIPLIER: f64 = 1.5;
/// A pivot within this fraction of the stop distance attracts the stop.
const PIVOT_SNAP_FRACTION: f64 = 0.25;
/// Snapped stops sit one cent beyond the level.
const PIVOT_SNAP_OFFSET: f64 = 0.01;

/// Fully specified trade plan.
///
/// Prices and `stop_distance`/`target_distance` are in the instrument
/// currency; `position_value_account`, `risk_amount`, the P&L
/// projections, and `commission_total` are in the account currency.
/// Monetary fields are rounded to 2 decimals, percentage fields to 1-2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub symbol: String,
    pub side: TradeSide,
    pub entry_price: f64,
    pub stop_price: f64,
    pub target_price: f64,
    pub stop_distance: f64,
    pub target_distance: f64,
    /// Raw (pre-snap) stop distance as a percentage of entry.
    pub stop_pct: f64,
    pub shares: u64,
    pub position_value: f64,
    pub position_value_account: f64,
    pub position_pct: f64,
    pub risk_amount: f64,
    pub projected_gain: f64,
    pub projected_loss: f64,
    pub effective_reward_risk: f64,
    pub commission_total: f64,
    pub break_even_price: f64,
    pub reward_risk_ratio: f64,
    pub warnings: Vec<String>,
}

/// Compute a trade plan, or `None` when entry price or ATR is
/// absent/non-positive: risk sizing is meaningless without volatility
/// context.
///
/// `settings` is trusted here; validate it at the boundary. `pivots`
/// is optional and only influences stop placement.
pub fn plan_trade(
    settings: &AccountSettings,
    side: TradeSide,
    symbol: &str,
    entry_price: f64,
    atr: Option<f64>,
    pivots: Option<&PivotLevels>,
) -> Option<TradePlan> {
    let atr = atr.filter(|a| *a > 0.0)?;
    if !(entry_price > 0.0) {
        return None;
    }

    // 1. ATR-based stop and target.
    let stop_distance = atr * ATR_STOP_MULTIPLIER;
    let stop_pct = stop_distance / entry_price * 100.0;
    let (mut stop_price, target_price) = match side {
        TradeSide::Buy => (
            entry_price - stop_distance,
            entry_price + stop_distance * settings.reward_risk_ratio,
        ),
        TradeSide::Sell => (
            entry_price + stop_distance,
            entry_price - stop_distance * settings.reward_risk_ratio,
        ),
    };

    // 2. Snap the stop to a nearby pivot on the protective side. Levels
    // are scanned in a fixed order and each can re-anchor the stop.
    if let Some(pivots) = pivots {
        for level in pivots.scan_order() {
            match side {
                TradeSide::Buy => {
                    if level < entry_price
                        && (level - stop_price).abs() < stop_distance * PIVOT_SNAP_FRACTION
                    {
                        stop_price = level - PIVOT_SNAP_OFFSET; // just below support
                    }
                }
                TradeSide::Sell => {
                    if level > entry_price
                        && (level - stop_price).abs() < stop_distance * PIVOT_SNAP_FRACTION
                    {
                        stop_price = level + PIVOT_SNAP_OFFSET; // just above resistance
                    }
                }
            }
        }
    }
    let effective_stop_distance = (entry_price - stop_price).abs();

    // 3. Risk budget, converted into the instrument currency.
    let risk_amount = settings.capital * settings.risk_pct / 100.0;
    let risk_amount_instr = risk_amount * settings.fx_rate;

    // 4. Share count, floored at one share.
    let shares = ((risk_amount_instr / effective_stop_distance).floor() as u64).max(1);

    // 5. Exposure and P&L projections, net of two commission legs.
    let position_value = shares as f64 * entry_price;
    let position_value_account = position_value / settings.fx_rate;
    let position_pct = position_value_account / settings.capital * 100.0;
    let commission_total = settings.commission_per_leg * 2.0;
    let target_distance = (entry_price - target_price).abs();
    let projected_gain = shares as f64 * target_distance / settings.fx_rate - commission_total;
    let projected_loss = shares as f64 * effective_stop_distance / settings.fx_rate + commission_total;
    let effective_reward_risk = projected_gain / projected_loss.max(0.01);

    let commission_per_share = commission_total * settings.fx_rate / shares as f64;
    let break_even_price = match side {
        TradeSide::Buy => entry_price + commission_per_share,
        TradeSide::Sell => entry_price - commission_per_share,
    };

    // 6. Warning policy: each check independent, multiple may co-fire.
    let mut warnings = Vec::new();
    if effective_reward_risk < 1.2 {
        warnings.push("Effective reward:risk below 1.2: trade not recommended".to_string());
    }
    if position_pct > 30.0 {
        warnings.push("Position exceeds 30% of capital: concentration risk".to_string());
    }
    if settings.commission_per_leg / risk_amount > 0.1 {
        warnings
            .push("Commissions exceed 10% of risk budget: consider a larger capital".to_string());
    }
    if stop_pct < 0.5 {
        warnings.push("Very tight stop loss: may be hit by market noise".to_string());
    }
    if stop_pct > 8.0 {
        warnings.push("Wide stop loss: mind the drawdown".to_string());
    }

    Some(TradePlan {
        symbol: symbol.to_string(),
        side,
        entry_price: round2(entry_price),
        stop_price: round2(stop_price),
        target_price: round2(target_price),
        stop_distance: round2(effective_stop_distance),
        target_distance: round2(target_distance),
        stop_pct: round2(stop_pct),
        shares,
        position_value: round2(position_value),
        position_value_account: round2(position_value_account),
        position_pct: round1(position_pct),
        risk_amount: round2(risk_amount),
        projected_gain: round2(projected_gain),
        projected_loss: round2(projected_loss.abs()),
        effective_reward_risk: round2(effective_reward_risk),
        commission_total: round2(commission_total),
        break_even_price: round2(break_even_price),
        reward_risk_ratio: settings.reward_risk_ratio,
        warnings,
    })
}

/// Quick position-size estimate for a calculator panel: stop expressed
/// as a percentage of entry instead of derived from ATR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickSize {
    pub shares: u64,
    pub risk_amount: f64,
    pub position_value: f64,
}

pub fn quick_size(
    capital: f64,
    risk_pct: f64,
    stop_pct: f64,
    entry_price: f64,
    fx_rate: f64,
) -> QuickSize {
    let risk_amount = capital * risk_pct / 100.0;
    let risk_instr = risk_amount * fx_rate;
    let stop_per_share = entry_price * stop_pct / 100.0;
    let shares = ((risk_instr / stop_per_share).floor() as u64).max(1);
    QuickSize {
        shares,
        risk_amount: round2(risk_amount),
        position_value: round2(shares as f64 * entry_price),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
