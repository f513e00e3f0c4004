//! Quote — latest market snapshot for a symbol.

use serde::{Deserialize, Serialize};

/// Live quote supplied by the market-data collaborator.
///
/// Optional at every call site: when no quote is available the signal
/// engine skips volume-direction confirmation and the risk engine
/// produces no plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub change: f64,
    pub change_pct: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub prev_close: f64,
}
