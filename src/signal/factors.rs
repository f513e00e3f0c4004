//! Typed factor-hit records and the score card.
//!
//! Each scoring factor that fires is recorded as an ordered
//! `(factor, side, weight, explanation)` record instead of an ad hoc
//! `score += / reasons.push` pair. The ordering of hits is a contract:
//! downstream consumers display reasons in evaluation order.

use serde::{Deserialize, Serialize};

/// The six factor families of the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Factor {
    Trend,
    Rsi,
    Macd,
    Volume,
    Bollinger,
    Stochastic,
}

/// Which accumulator a hit contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Bull,
    Bear,
}

/// One fired factor.
///
/// `explanation` is `None` for silent hits (the weak Bollinger
/// trend-following contribution carries no display text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorHit {
    pub factor: Factor,
    pub side: Side,
    pub weight: f64,
    pub explanation: Option<String>,
}

/// Running bull/bear accumulators plus the ordered hit list.
#[derive(Debug, Clone, Default)]
pub struct ScoreCard {
    bull: f64,
    bear: f64,
    hits: Vec<FactorHit>,
}

impl ScoreCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit and add its weight to the matching accumulator.
    pub fn add(
        &mut self,
        factor: Factor,
        side: Side,
        weight: f64,
        explanation: Option<String>,
    ) {
        match side {
            Side::Bull => self.bull += weight,
            Side::Bear => self.bear += weight,
        }
        self.hits.push(FactorHit { factor, side, weight, explanation });
    }

    /// Multiply both accumulators in place.
    ///
    /// Used by the low-volume dampener; its effect depends on how much
    /// score has already accumulated when it fires, which is preserved
    /// deliberately.
    pub fn dampen(&mut self, mult: f64) {
        self.bull *= mult;
        self.bear *= mult;
    }

    pub fn bull(&self) -> f64 {
        self.bull
    }

    pub fn bear(&self) -> f64 {
        self.bear
    }

    pub fn hits(&self) -> &[FactorHit] {
        &self.hits
    }

    /// Display reasons for one side, in evaluation order.
    pub fn reasons_for(&self, side: Side) -> Vec<String> {
        self.hits
            .iter()
            .filter(|h| h.side == side)
            .filter_map(|h| h.explanation.clone())
            .collect()
    }
}
