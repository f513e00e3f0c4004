//! US market session clock.
//!
//! The session state is derived from an explicitly passed instant, never
//! from a hidden system clock, so scoring stays deterministic. Hours are
//! US Eastern: regular session 9:30-16:00, pre-market 4:00-9:30, after
//! hours 16:00-20:00, weekends closed.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Where the US equity session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketSession {
    Open,
    PreMarket,
    AfterHours,
    Closed,
    Weekend,
}

impl MarketSession {
    pub fn label(&self) -> &'static str {
        match self {
            MarketSession::Open => "Market Open",
            MarketSession::PreMarket => "Pre-Market",
            MarketSession::AfterHours => "After Hours",
            MarketSession::Closed => "Closed",
            MarketSession::Weekend => "Weekend",
        }
    }
}

/// Session state attached to every signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub state: MarketSession,
    pub tradeable: bool,
}

impl SessionInfo {
    /// Session state at the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        let et = now.naive_utc() - Duration::hours(if is_us_dst(now) { 4 } else { 5 });

        let state = if matches!(et.weekday(), Weekday::Sat | Weekday::Sun) {
            MarketSession::Weekend
        } else {
            let hours = et.hour() as f64 + et.minute() as f64 / 60.0;
            if (9.5..16.0).contains(&hours) {
                MarketSession::Open
            } else if (4.0..9.5).contains(&hours) {
                MarketSession::PreMarket
            } else if (16.0..20.0).contains(&hours) {
                MarketSession::AfterHours
            } else {
                MarketSession::Closed
            }
        };

        SessionInfo {
            state,
            tradeable: state == MarketSession::Open,
        }
    }
}

/// US daylight saving: second Sunday of March 2:00 ET through first
/// Sunday of November 2:00 ET. Evaluated on the Eastern Standard clock
/// (2:00 EDT at the fall boundary is 1:00 EST).
fn is_us_dst(now: DateTime<Utc>) -> bool {
    let est = now.naive_utc() - Duration::hours(5);
    let year = est.year();

    let dst_start = nth_weekday(year, 3, Weekday::Sun, 2).and_hms_opt(2, 0, 0);
    let dst_end = nth_weekday(year, 11, Weekday::Sun, 1).and_hms_opt(1, 0, 0);
    match (dst_start, dst_end) {
        (Some(start), Some(end)) => est >= start && est < end,
        _ => false,
    }
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> NaiveDate {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
        .expect("nth weekday exists for every month")
}
