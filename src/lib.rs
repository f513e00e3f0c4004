//! marketpulse: deterministic decision core for a trading assistant.
//!
//! The crate turns a candle history plus an optional live quote into a
//! directional signal, a risk-sized trade plan, and exit verdicts for
//! open positions. Everything is a pure function of its inputs: the
//! evaluation instant is always passed in, nothing reads the system
//! clock or does I/O, and recomputation over the same data is
//! bit-identical.
//!
//! Layering, bottom up:
//! - [`domain`]: candles, quotes, positions, validated account settings.
//! - [`indicators`]: aligned `Option<f64>` series and the last-available
//!   snapshot.
//! - [`signal`]: six-factor weighted scoring into BUY / SELL / WAIT.
//! - [`risk`]: ATR-based stops, pivot snapping, risk-budget sizing.
//! - [`exit`]: priority-ordered exit checks for open positions.
//! - [`analysis`]: the pipeline tying the layers together.

pub mod analysis;
pub mod domain;
pub mod exit;
pub mod indicators;
pub mod risk;
pub mod signal;

pub use analysis::{analyze, check_open_position, Analysis, AnalysisError, MIN_BARS};
pub use domain::{AccountSettings, Candle, Direction, OpenPosition, Quote, TradeSide};
pub use exit::{check_exit, ExitVerdict};
pub use indicators::{compute, IndicatorParams, IndicatorSet, IndicatorSnapshot};
pub use risk::{plan_trade, quick_size, QuickSize, TradePlan};
pub use signal::{score, MarketSession, SessionInfo, Signal};
