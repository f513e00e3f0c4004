//! End-to-end scenarios through the public API: candles and a quote in,
//! signal, plan, and exit verdicts out.

use chrono::{DateTime, TimeZone, Utc};

use marketpulse::domain::{
    AccountSettings, Candle, Direction, OpenPosition, PositionStatus, Quote, TradeSide,
};
use marketpulse::indicators::IndicatorSnapshot;
use marketpulse::{analyze, check_exit, plan_trade, score, MarketSession};

fn make_candles(closes: &[f64], volumes: &[f64]) -> Vec<Candle> {
    assert_eq!(closes.len(), volumes.len());
    let base_ts = 1_700_000_000_000_i64;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base_ts + i as i64 * 900_000,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: volumes[i],
            }
        })
        .collect()
}

/// Wed 2024-06-12 15:00 UTC = 11:00 EDT, regular session.
fn open_session() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 15, 0, 0).unwrap()
}

/// Sat 2024-06-15.
fn weekend() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 15, 0, 0).unwrap()
}

fn quote(price: f64, change: f64) -> Quote {
    Quote {
        price,
        change,
        change_pct: change / (price - change) * 100.0,
        high: price + 1.0,
        low: price - 2.0,
        open: price - change,
        prev_close: price - change,
    }
}

#[test]
fn accelerating_uptrend_with_volume_spike_is_a_buy() {
    // 150 bars of an accelerating uptrend; the last bar trades 80% above
    // the baseline volume so the relative-volume confirmation fires.
    let closes: Vec<f64> =
        (0..150).map(|i| 100.0 + i as f64 * 0.4 + (i as f64 / 20.0).powi(2)).collect();
    let mut volumes = vec![1000.0; 150];
    volumes[149] = 1800.0;
    let candles = make_candles(&closes, &volumes);
    let last = *closes.last().unwrap();
    let settings = AccountSettings::default();

    let analysis =
        analyze(&candles, "NVDA", Some(&quote(last, 1.2)), &settings, open_session()).unwrap();

    assert_eq!(analysis.signal.direction, Direction::Buy);
    assert!(analysis.signal.confidence >= 60, "confidence {}", analysis.signal.confidence);
    assert!(analysis.signal.bull_score > analysis.signal.bear_score);
    assert!(!analysis.signal.reasons.is_empty());
    assert_eq!(analysis.signal.session.state, MarketSession::Open);

    let plan = analysis.plan.expect("a buy with quote and ATR sizes a plan");
    assert_eq!(plan.side, TradeSide::Buy);
    assert!(plan.stop_price < plan.entry_price);
    assert!(plan.target_price > plan.entry_price);
    assert!(plan.shares >= 1);
    assert!((plan.risk_amount - 150.0).abs() < 1e-9);
}

#[test]
fn conflicting_factors_yield_wait_with_zero_confidence() {
    // A mild bull lean that clears neither the absolute floor nor the
    // margin: one RSI hit for, one MACD hit against.
    let snap = IndicatorSnapshot {
        rsi: Some(50.0),
        macd_line: Some(-0.2),
        macd_signal: Some(0.1),
        close: 100.0,
        ..Default::default()
    };
    let signal = score(&snap, "AAPL", None, open_session());

    assert_eq!(signal.direction, Direction::Wait);
    assert_eq!(signal.confidence, 0);
    assert_eq!(signal.reasons, vec!["Conflicting signals: wait for a clear direction"]);
}

#[test]
fn weekend_penalizes_confidence_and_appends_caveat() {
    // Strongly bullish snapshot scored outside the session.
    let snap = IndicatorSnapshot {
        ema_short: Some(105.0),
        ema_medium: Some(100.0),
        ema_long: Some(95.0),
        ema_trend: Some(90.0),
        rsi: Some(55.0),
        macd_line: Some(1.0),
        macd_signal: Some(0.5),
        macd_hist: Some(0.5),
        macd_hist_prev: Some(0.2),
        pct_b: Some(0.1),
        stoch_k: Some(15.0),
        stoch_d: Some(10.0),
        obv: 1000.0,
        obv_ema: Some(500.0),
        rel_volume: Some(1.0),
        close: 110.0,
        ..Default::default()
    };

    let weekday = score(&snap, "AAPL", None, open_session());
    let saturday = score(&snap, "AAPL", None, weekend());

    assert_eq!(weekday.direction, Direction::Buy);
    assert_eq!(saturday.direction, Direction::Buy);
    assert_eq!(saturday.confidence, weekday.confidence - 15);
    assert_eq!(saturday.session.state, MarketSession::Weekend);
    assert!(!saturday.session.tradeable);
    assert!(saturday.reasons.last().unwrap().contains("Weekend"));
    assert!(!weekday.reasons.iter().any(|r| r.contains("Caution")));
}

#[test]
fn default_account_sizes_54_shares_at_entry_100_atr_2() {
    // 10k capital at 1.5% risk is 150 account currency, 162 after fx;
    // stop distance 1.5 * ATR = 3 gives floor(162 / 3) = 54 shares.
    let settings = AccountSettings::default();
    let plan = plan_trade(&settings, TradeSide::Buy, "AAPL", 100.0, Some(2.0), None).unwrap();

    assert_eq!(plan.shares, 54);
    assert!((plan.stop_price - 97.0).abs() < 1e-9);
    assert!((plan.target_price - 106.0).abs() < 1e-9);
    assert!((plan.risk_amount - 150.0).abs() < 1e-9);
    assert!((plan.commission_total - 7.9).abs() < 1e-9);
}

#[test]
fn open_long_exits_on_stop_breach() {
    let position = OpenPosition {
        symbol: "AAPL".to_string(),
        side: TradeSide::Buy,
        entry_price: 100.0,
        stop_price: 97.0,
        target_price: 106.0,
        shares: 54,
        status: PositionStatus::Open,
    };
    let snap = IndicatorSnapshot { rsi: Some(45.0), close: 96.5, ..Default::default() };

    let verdict = check_exit(&position, 96.5, &snap);
    assert!(verdict.should_exit);
    assert!(verdict.reasons[0].contains("Stop loss hit at 97.00"));
    assert!((verdict.unrealized_pnl_pct - (-3.5)).abs() < 1e-9);

    // One tick above the stop keeps the position open.
    let verdict = check_exit(&position, 97.01, &snap);
    assert!(!verdict.should_exit);
}

#[test]
fn short_history_is_rejected_before_any_scoring() {
    let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    let volumes = vec![1000.0; 20];
    let candles = make_candles(&closes, &volumes);
    let err = analyze(&candles, "AAPL", None, &AccountSettings::default(), open_session())
        .unwrap_err();
    assert_eq!(err.to_string(), "insufficient history: got 20 bars, need 30");
}
