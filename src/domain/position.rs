//! Open position record from the journal collaborator.

use serde::{Deserialize, Serialize};

use super::TradeSide;

/// Lifecycle state of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    Open,
    Closed,
}

/// A position the journal collaborator holds open.
///
/// The exit monitor reads this record to evaluate stop/target/technical
/// exits; it never creates, persists, or closes it. Closing is a
/// separate, user-confirmed journal action outside this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub symbol: String,
    pub side: TradeSide,
    pub entry_price: f64,
    pub stop_price: f64,
    pub target_price: f64,
    pub shares: u64,
    pub status: PositionStatus,
}
