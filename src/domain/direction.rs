//! Signal direction and concrete trade side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict of the signal scoring engine.
///
/// `Wait` is the designed degraded output, not an error: when factors
/// conflict the engine still returns a usable signal object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
    Wait,
}

impl Direction {
    /// Concrete trade side, if this signal is actionable.
    pub fn side(&self) -> Option<TradeSide> {
        match self {
            Direction::Buy => Some(TradeSide::Buy),
            Direction::Sell => Some(TradeSide::Sell),
            Direction::Wait => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
            Direction::Wait => write!(f, "WAIT"),
        }
    }
}

/// Side of an actual position. Unlike [`Direction`] there is no neutral
/// state: a position is either long or short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn is_long(&self) -> bool {
        matches!(self, TradeSide::Buy)
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}
