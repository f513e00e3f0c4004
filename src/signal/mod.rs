//! Multi-factor signal scoring engine.
//!
//! Six weighted factor families (EMA trend, RSI, MACD, volume, Bollinger
//! %B, stochastic) feed two accumulators, bull and bear. A direction is
//! only declared when the winning side clears both an absolute floor and
//! a margin over the other side; everything else is a WAIT with a single
//! conflicting-signals reason. Factors whose indicators are still
//! warming up are skipped individually, so short history degrades the
//! signal instead of erroring.
//!
//! `score` is a pure function of its arguments: the evaluation instant
//! is passed in explicitly and the engine holds no state between calls.

pub mod factors;
pub mod session;

pub use factors::{Factor, FactorHit, ScoreCard, Side};
pub use session::{MarketSession, SessionInfo};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Direction, Quote};
use crate::indicators::IndicatorSnapshot;

/// Winning side must lead by at least this margin.
const MIN_SCORE_DIFF: f64 = 28.0;
/// ...and reach at least this absolute score.
const MIN_WINNING_SCORE: f64 = 35.0;
/// Confidence is capped here regardless of score dominance.
const MAX_CONFIDENCE: f64 = 95.0;
/// Flat confidence penalty outside the regular session.
const SESSION_PENALTY: u8 = 15;

/// High relative volume confirms the move; low volume dampens everything.
const REL_VOL_HIGH: f64 = 1.5;
const REL_VOL_LOW: f64 = 0.6;
const LOW_VOLUME_DAMPENER: f64 = 0.85;

/// Signal verdict with confidence and fired-factor explanations.
///
/// Created fresh per invocation and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub direction: Direction,
    /// 0..=95.
    pub confidence: u8,
    pub bull_score: f64,
    pub bear_score: f64,
    /// Winning side's explanations, in factor evaluation order.
    pub reasons: Vec<String>,
    pub session: SessionInfo,
    pub indicators: IndicatorEcho,
    /// Evaluation instant, epoch milliseconds.
    pub timestamp: i64,
}

/// Key indicator values echoed on the signal for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorEcho {
    pub rsi: Option<f64>,
    pub macd_hist: Option<f64>,
    pub ema_short: Option<f64>,
    pub ema_medium: Option<f64>,
    pub stoch_k: Option<f64>,
    pub pct_b: Option<f64>,
    pub rel_volume: Option<f64>,
    pub atr: Option<f64>,
}

impl IndicatorEcho {
    fn from_snapshot(snap: &IndicatorSnapshot) -> Self {
        Self {
            rsi: snap.rsi,
            macd_hist: snap.macd_hist,
            ema_short: snap.ema_short,
            ema_medium: snap.ema_medium,
            stoch_k: snap.stoch_k,
            pct_b: snap.pct_b,
            rel_volume: snap.rel_volume,
            atr: snap.atr,
        }
    }
}

/// Score the latest indicator snapshot into a directional signal.
///
/// `quote` is optional; without it the volume-direction confirmation is
/// skipped (the dampener and OBV checks still apply). `now` drives only
/// the session caveat and the output timestamp.
pub fn score(
    snap: &IndicatorSnapshot,
    symbol: &str,
    quote: Option<&Quote>,
    now: DateTime<Utc>,
) -> Signal {
    let session = SessionInfo::at(now);
    let mut card = ScoreCard::new();

    trend_factor(snap, &mut card);
    rsi_factor(snap, &mut card);
    macd_factor(snap, &mut card);
    volume_factor(snap, quote, &mut card);
    bollinger_factor(snap, &mut card);
    stochastic_factor(snap, &mut card);

    let bull = card.bull();
    let bear = card.bear();
    let diff = bull - bear;
    let total = (bull + bear).max(1.0);

    let (direction, mut reasons, mut confidence) = if diff >= MIN_SCORE_DIFF && bull >= MIN_WINNING_SCORE {
        let conf = (bull / total * 100.0).round().min(MAX_CONFIDENCE) as u8;
        (Direction::Buy, card.reasons_for(Side::Bull), conf)
    } else if diff <= -MIN_SCORE_DIFF && bear >= MIN_WINNING_SCORE {
        let conf = (bear / total * 100.0).round().min(MAX_CONFIDENCE) as u8;
        (Direction::Sell, card.reasons_for(Side::Bear), conf)
    } else {
        (
            Direction::Wait,
            vec!["Conflicting signals: wait for a clear direction".to_string()],
            0,
        )
    };

    // Soft session filter: dampens confidence, never flips direction.
    if !session.tradeable && confidence > 0 {
        confidence = confidence.saturating_sub(SESSION_PENALTY);
        reasons.push(format!(
            "Caution: market {}, execute only if already tradeable on your broker",
            session.state.label()
        ));
    }

    Signal {
        symbol: symbol.to_string(),
        direction,
        confidence,
        bull_score: bull.round(),
        bear_score: bear.round(),
        reasons,
        session,
        indicators: IndicatorEcho::from_snapshot(snap),
        timestamp: now.timestamp_millis(),
    }
}

/// Factor 1: EMA trend alignment (up to 35 per side).
///
/// The medium/long checks are gated on the short/medium pair being
/// available, so a series too short for EMA 21 contributes nothing here.
fn trend_factor(snap: &IndicatorSnapshot, card: &mut ScoreCard) {
    let (Some(ema_short), Some(ema_medium)) = (snap.ema_short, snap.ema_medium) else {
        return;
    };
    let close = snap.close;

    if ema_short > ema_medium && close > ema_medium {
        card.add(
            Factor::Trend,
            Side::Bull,
            20.0,
            Some("EMA 9 above EMA 21: short-term uptrend".into()),
        );
    } else if ema_short < ema_medium && close < ema_medium {
        card.add(
            Factor::Trend,
            Side::Bear,
            20.0,
            Some("EMA 9 below EMA 21: short-term downtrend".into()),
        );
    }

    if let Some(ema_long) = snap.ema_long {
        if close > ema_long {
            card.add(
                Factor::Trend,
                Side::Bull,
                8.0,
                Some("Price above EMA 50 (medium-term trend positive)".into()),
            );
        } else {
            card.add(
                Factor::Trend,
                Side::Bear,
                8.0,
                Some("Price below EMA 50 (medium-term trend negative)".into()),
            );
        }
    }

    if let Some(ema_trend) = snap.ema_trend {
        if close > ema_trend {
            card.add(Factor::Trend, Side::Bull, 7.0, Some("Above EMA 200 (golden zone)".into()));
        } else {
            card.add(Factor::Trend, Side::Bear, 7.0, Some("Below EMA 200 (death zone)".into()));
        }
    }
}

/// Factor 2: RSI zones.
fn rsi_factor(snap: &IndicatorSnapshot, card: &mut ScoreCard) {
    let Some(r) = snap.rsi else { return };

    if (45.0..=63.0).contains(&r) {
        card.add(
            Factor::Rsi,
            Side::Bull,
            15.0,
            Some(format!("RSI {r:.1}: healthy bullish momentum")),
        );
    } else if r < 30.0 {
        card.add(
            Factor::Rsi,
            Side::Bull,
            18.0,
            Some(format!("RSI {r:.1}: oversold, bounce expected")),
        );
    } else if r > 70.0 {
        card.add(
            Factor::Rsi,
            Side::Bear,
            18.0,
            Some(format!("RSI {r:.1}: overbought, correction expected")),
        );
    } else if (37.0..45.0).contains(&r) {
        card.add(Factor::Rsi, Side::Bull, 6.0, Some(format!("RSI {r:.1}: possible rebound")));
    } else if r > 63.0 && r <= 70.0 {
        card.add(Factor::Rsi, Side::Bear, 10.0, Some(format!("RSI {r:.1}: overheating zone")));
    }
}

/// Factor 3: MACD line vs signal, plus histogram zero-cross/expansion.
///
/// The zero-cross is the strongest single factor and is checked before
/// expansion so a crossover bar scores 15, not 10.
fn macd_factor(snap: &IndicatorSnapshot, card: &mut ScoreCard) {
    let (Some(line), Some(signal)) = (snap.macd_line, snap.macd_signal) else {
        return;
    };

    if line > signal {
        card.add(Factor::Macd, Side::Bull, 12.0, Some("MACD above signal line".into()));
    } else {
        card.add(Factor::Macd, Side::Bear, 12.0, Some("MACD below signal line".into()));
    }

    let (Some(hist), Some(hist_prev)) = (snap.macd_hist, snap.macd_hist_prev) else {
        return;
    };
    if hist > 0.0 && hist_prev <= 0.0 {
        card.add(
            Factor::Macd,
            Side::Bull,
            15.0,
            Some("Bullish MACD crossover (strong signal)".into()),
        );
    } else if hist < 0.0 && hist_prev >= 0.0 {
        card.add(
            Factor::Macd,
            Side::Bear,
            15.0,
            Some("Bearish MACD crossover (strong signal)".into()),
        );
    } else if hist > 0.0 && hist > hist_prev {
        card.add(Factor::Macd, Side::Bull, 10.0, Some("MACD histogram expanding positive".into()));
    } else if hist < 0.0 && hist < hist_prev {
        card.add(Factor::Macd, Side::Bear, 10.0, Some("MACD histogram expanding negative".into()));
    }
}

/// Factor 4: volume confirmation.
///
/// High relative volume corroborates the quote's direction of change;
/// low relative volume multiplies BOTH accumulators by 0.85 at this
/// point in the sequence. The OBV check sits inside the relative-volume
/// gate, matching the calibrated behavior.
fn volume_factor(snap: &IndicatorSnapshot, quote: Option<&Quote>, card: &mut ScoreCard) {
    let Some(rel_vol) = snap.rel_volume else { return };

    if rel_vol > REL_VOL_HIGH {
        let change_pct = quote.map(|q| q.change_pct).unwrap_or(0.0);
        if change_pct > 0.0 {
            card.add(
                Factor::Volume,
                Side::Bull,
                15.0,
                Some(format!("Volume {rel_vol:.1}x average confirms the rally")),
            );
        } else if change_pct < 0.0 {
            card.add(
                Factor::Volume,
                Side::Bear,
                15.0,
                Some(format!("Volume {rel_vol:.1}x average confirms the selloff")),
            );
        }
    } else if rel_vol < REL_VOL_LOW {
        card.dampen(LOW_VOLUME_DAMPENER);
    }

    if let Some(obv_ema) = snap.obv_ema {
        if snap.obv > obv_ema {
            card.add(Factor::Volume, Side::Bull, 8.0, Some("OBV above its EMA (accumulation)".into()));
        } else {
            card.add(Factor::Volume, Side::Bear, 8.0, Some("OBV below its EMA (distribution)".into()));
        }
    }
}

/// Factor 5: Bollinger %B mean reversion.
///
/// Band extremes score the reversal side; the mid-range contributions
/// are weak and silent (no display reason).
fn bollinger_factor(snap: &IndicatorSnapshot, card: &mut ScoreCard) {
    let Some(pct_b) = snap.pct_b else { return };

    if pct_b < 0.15 {
        card.add(
            Factor::Bollinger,
            Side::Bull,
            12.0,
            Some("Price at lower Bollinger band (mean reversion)".into()),
        );
    } else if pct_b > 0.85 {
        card.add(
            Factor::Bollinger,
            Side::Bear,
            12.0,
            Some("Price at upper Bollinger band (mean reversion)".into()),
        );
    } else if pct_b > 0.5 && pct_b < 0.8 {
        card.add(Factor::Bollinger, Side::Bull, 4.0, None);
    } else if pct_b < 0.5 && pct_b > 0.2 {
        card.add(Factor::Bollinger, Side::Bear, 4.0, None);
    }
}

/// Factor 6: stochastic ordering and extremes (both may fire).
fn stochastic_factor(snap: &IndicatorSnapshot, card: &mut ScoreCard) {
    let (Some(k), Some(d)) = (snap.stoch_k, snap.stoch_d) else {
        return;
    };

    if k > d && k < 80.0 {
        card.add(
            Factor::Stochastic,
            Side::Bull,
            8.0,
            Some(format!("Stochastic bull K({k:.0}) > D({d:.0})")),
        );
    } else if k < d && k > 20.0 {
        card.add(
            Factor::Stochastic,
            Side::Bear,
            8.0,
            Some(format!("Stochastic bear K({k:.0}) < D({d:.0})")),
        );
    }
    if k < 20.0 {
        card.add(Factor::Stochastic, Side::Bull, 10.0, Some(format!("Stochastic oversold ({k:.0})")));
    }
    if k > 80.0 {
        card.add(Factor::Stochastic, Side::Bear, 10.0, Some(format!("Stochastic overbought ({k:.0})")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Wed 2024-06-12 15:00 UTC = 11:00 EDT, regular session.
    fn open_session_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 15, 0, 0).unwrap()
    }

    /// Sat 2024-06-15: weekend.
    fn weekend_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 15, 0, 0).unwrap()
    }

    fn quote_with_change(change_pct: f64) -> Quote {
        Quote {
            price: 100.0,
            change: change_pct,
            change_pct,
            high: 101.0,
            low: 99.0,
            open: 100.0,
            prev_close: 100.0,
        }
    }

    /// Snapshot with every factor unavailable except what the test sets.
    fn empty_snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot { close: 100.0, ..Default::default() }
    }

    fn bullish_snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            ema_short: Some(102.0),
            ema_medium: Some(101.0),
            ema_long: Some(99.0),
            ema_trend: Some(95.0),
            rsi: Some(55.0),
            macd_line: Some(1.2),
            macd_signal: Some(0.8),
            macd_hist: Some(0.4),
            macd_hist_prev: Some(0.2),
            rel_volume: Some(1.8),
            obv: 5_000.0,
            obv_ema: Some(4_000.0),
            pct_b: Some(0.6),
            stoch_k: Some(65.0),
            stoch_d: Some(58.0),
            close: 103.0,
            ..Default::default()
        }
    }

    #[test]
    fn fully_bullish_snapshot_is_a_buy() {
        let snap = bullish_snapshot();
        let q = quote_with_change(1.2);
        let sig = score(&snap, "AAPL", Some(&q), open_session_instant());
        assert_eq!(sig.direction, Direction::Buy);
        // trend 35 + rsi 15 + macd 22 + volume 23 + bb 4 + stoch 8 = 107
        assert_eq!(sig.bull_score, 107.0);
        assert_eq!(sig.bear_score, 0.0);
        assert_eq!(sig.confidence, 95); // capped
        assert!(sig.reasons[0].contains("EMA 9 above EMA 21"));
    }

    #[test]
    fn reasons_are_in_factor_evaluation_order() {
        let snap = bullish_snapshot();
        let q = quote_with_change(1.0);
        let sig = score(&snap, "AAPL", Some(&q), open_session_instant());
        // Silent Bollinger +4 carries no reason; stochastic follows volume.
        let joined = sig.reasons.join("|");
        let trend = joined.find("EMA 9").unwrap();
        let rsi = joined.find("RSI").unwrap();
        let macd = joined.find("MACD").unwrap();
        let vol = joined.find("Volume").unwrap();
        let stoch = joined.find("Stochastic").unwrap();
        assert!(trend < rsi && rsi < macd && macd < vol && vol < stoch);
    }

    #[test]
    fn mirrored_bearish_snapshot_is_a_sell() {
        let snap = IndicatorSnapshot {
            ema_short: Some(98.0),
            ema_medium: Some(99.0),
            ema_long: Some(101.0),
            ema_trend: Some(105.0),
            rsi: Some(72.0),
            macd_line: Some(-1.2),
            macd_signal: Some(-0.8),
            macd_hist: Some(-0.4),
            macd_hist_prev: Some(-0.2),
            rel_volume: Some(1.8),
            obv: 3_000.0,
            obv_ema: Some(4_000.0),
            pct_b: Some(0.9),
            stoch_k: Some(35.0),
            stoch_d: Some(42.0),
            close: 97.0,
            ..Default::default()
        };
        let q = quote_with_change(-1.5);
        let sig = score(&snap, "TSLA", Some(&q), open_session_instant());
        assert_eq!(sig.direction, Direction::Sell);
        assert!(sig.confidence >= 60);
        assert!(sig.reasons.iter().any(|r| r.contains("overbought")));
    }

    #[test]
    fn balanced_factors_wait() {
        // bull: trend 20 + rsi 15 = 35; bear: macd 12. diff 23 < 28 -> WAIT.
        let snap = IndicatorSnapshot {
            ema_short: Some(101.0),
            ema_medium: Some(100.0),
            rsi: Some(50.0),
            macd_line: Some(1.0),
            macd_signal: Some(1.2),
            close: 100.5,
            ..Default::default()
        };
        let sig = score(&snap, "MSFT", None, open_session_instant());
        assert_eq!(sig.direction, Direction::Wait);
        assert_eq!(sig.confidence, 0);
        assert_eq!(sig.reasons, vec!["Conflicting signals: wait for a clear direction"]);
    }

    #[test]
    fn empty_snapshot_waits_without_panicking() {
        let sig = score(&empty_snapshot(), "NVDA", None, open_session_instant());
        assert_eq!(sig.direction, Direction::Wait);
        assert_eq!(sig.bull_score, 0.0);
        assert_eq!(sig.bear_score, 0.0);
    }

    #[test]
    fn buy_needs_absolute_floor_not_just_margin() {
        // bull 32 (trend 20 + macd line 12) vs bear 0: diff >= 28
        // but bull < 35 -> WAIT.
        let snap = IndicatorSnapshot {
            ema_short: Some(101.0),
            ema_medium: Some(100.0),
            macd_line: Some(1.0),
            macd_signal: Some(0.5),
            macd_hist: Some(0.5),
            macd_hist_prev: Some(0.6), // shrinking, no expansion bonus
            close: 100.5,
            ..Default::default()
        };
        let sig = score(&snap, "AMD", None, open_session_instant());
        assert_eq!(sig.bull_score, 32.0);
        assert_eq!(sig.direction, Direction::Wait);
    }

    #[test]
    fn macd_zero_cross_beats_expansion() {
        // Crossover bar: hist > 0, prev <= 0 scores 15, not the 10 an
        // expanding histogram would get.
        let snap = IndicatorSnapshot {
            macd_line: Some(0.3),
            macd_signal: Some(0.1),
            macd_hist: Some(0.2),
            macd_hist_prev: Some(-0.1),
            close: 100.0,
            ..Default::default()
        };
        let sig = score(&snap, "X", None, open_session_instant());
        assert_eq!(sig.bull_score, 27.0); // 12 line + 15 crossover
        assert!(sig.session.tradeable);
    }

    #[test]
    fn high_volume_without_quote_skips_confirmation() {
        let mut snap = empty_snapshot();
        snap.rel_volume = Some(2.0);
        let sig = score(&snap, "X", None, open_session_instant());
        assert_eq!(sig.bull_score, 0.0);
        assert_eq!(sig.bear_score, 0.0);
    }

    #[test]
    fn low_volume_dampens_accumulated_score() {
        // Trend fires 35 bull before the dampener: 35 * 0.85 = 29.75 -> 30 rounded.
        let snap = IndicatorSnapshot {
            ema_short: Some(102.0),
            ema_medium: Some(101.0),
            ema_long: Some(99.0),
            ema_trend: Some(95.0),
            rel_volume: Some(0.4),
            close: 103.0,
            ..Default::default()
        };
        let sig = score(&snap, "X", None, open_session_instant());
        assert_eq!(sig.bull_score, 30.0);
        assert_eq!(sig.direction, Direction::Wait); // 29.75 < 35 floor
    }

    #[test]
    fn obv_zero_is_a_legitimate_value() {
        // OBV exactly 0 with an EMA below it still counts as accumulation.
        let snap = IndicatorSnapshot {
            rel_volume: Some(1.0),
            obv: 0.0,
            obv_ema: Some(-500.0),
            close: 100.0,
            ..Default::default()
        };
        let sig = score(&snap, "X", None, open_session_instant());
        assert_eq!(sig.bull_score, 8.0);
    }

    #[test]
    fn obv_check_requires_rel_volume() {
        // The OBV comparison sits inside the relative-volume gate.
        let snap = IndicatorSnapshot {
            obv: 5_000.0,
            obv_ema: Some(1_000.0),
            close: 100.0,
            ..Default::default()
        };
        let sig = score(&snap, "X", None, open_session_instant());
        assert_eq!(sig.bull_score, 0.0);
    }

    #[test]
    fn stochastic_extreme_and_ordering_can_both_fire() {
        // K=15 < D=30: K < 20 blocks the bear ordering hit (needs K > 20)
        // but fires the oversold bull hit.
        let snap = IndicatorSnapshot {
            stoch_k: Some(15.0),
            stoch_d: Some(30.0),
            close: 100.0,
            ..Default::default()
        };
        let sig = score(&snap, "X", None, open_session_instant());
        assert_eq!(sig.bull_score, 10.0);
        assert_eq!(sig.bear_score, 0.0);

        // K=85 > D=70: bull ordering is blocked by K >= 80, overbought fires.
        let snap = IndicatorSnapshot {
            stoch_k: Some(85.0),
            stoch_d: Some(70.0),
            close: 100.0,
            ..Default::default()
        };
        let sig = score(&snap, "X", None, open_session_instant());
        assert_eq!(sig.bear_score, 10.0);
        assert_eq!(sig.bull_score, 0.0);
    }

    #[test]
    fn weekend_session_reduces_confidence_and_appends_caveat() {
        let snap = bullish_snapshot();
        let q = quote_with_change(1.0);
        let open = score(&snap, "AAPL", Some(&q), open_session_instant());
        let weekend = score(&snap, "AAPL", Some(&q), weekend_instant());
        assert_eq!(weekend.direction, open.direction); // never flips
        assert_eq!(weekend.confidence, open.confidence - 15);
        assert!(weekend.reasons.last().unwrap().contains("Weekend"));
        assert_eq!(weekend.reasons.len(), open.reasons.len() + 1);
    }

    #[test]
    fn weekend_wait_keeps_confidence_zero_and_no_caveat() {
        let sig = score(&empty_snapshot(), "X", None, weekend_instant());
        assert_eq!(sig.confidence, 0);
        assert_eq!(sig.reasons.len(), 1);
    }

    #[test]
    fn determinism_same_inputs_same_signal() {
        let snap = bullish_snapshot();
        let q = quote_with_change(0.7);
        let now = open_session_instant();
        assert_eq!(score(&snap, "AAPL", Some(&q), now), score(&snap, "AAPL", Some(&q), now));
    }
}
