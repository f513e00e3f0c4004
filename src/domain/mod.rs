//! Caller-facing value types.
//!
//! Everything in this module is owned by the caller and read-only for the
//! engines: candle history, the live quote, account settings, and journal
//! position records. The engines never mutate these and never hold onto
//! them between calls.

pub mod candle;
pub mod direction;
pub mod position;
pub mod quote;
pub mod settings;

pub use candle::Candle;
pub use direction::{Direction, TradeSide};
pub use position::{OpenPosition, PositionStatus};
pub use quote::Quote;
pub use settings::{AccountSettings, SettingsError};
