//! Account settings for risk sizing, validated at the boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failures for [`AccountSettings`].
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("capital must be > 0, got {0}")]
    NonPositiveCapital(f64),
    #[error("risk_pct must be in (0, 100], got {0}")]
    RiskPctOutOfRange(f64),
    #[error("reward_risk_ratio must be > 0, got {0}")]
    NonPositiveRewardRisk(f64),
    #[error("commission_per_leg must be >= 0, got {0}")]
    NegativeCommission(f64),
    #[error("fx_rate must be > 0, got {0}")]
    NonPositiveFxRate(f64),
}

/// Caller-owned risk parameters.
///
/// `capital`, `commission_per_leg`, and the derived risk amount are in
/// the account currency; prices are in the instrument currency.
/// `fx_rate` converts account currency into instrument currency
/// (e.g. EUR account trading USD stocks at ~1.08).
///
/// The risk engine trusts these values; construct through [`new`] (or
/// call [`validate`]) at the boundary so non-finite arithmetic cannot
/// propagate into a plan.
///
/// [`new`]: AccountSettings::new
/// [`validate`]: AccountSettings::validate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSettings {
    pub capital: f64,
    pub risk_pct: f64,
    pub reward_risk_ratio: f64,
    pub commission_per_leg: f64,
    pub fx_rate: f64,
}

impl AccountSettings {
    /// Validated constructor.
    pub fn new(
        capital: f64,
        risk_pct: f64,
        reward_risk_ratio: f64,
        commission_per_leg: f64,
        fx_rate: f64,
    ) -> Result<Self, SettingsError> {
        let settings = Self {
            capital,
            risk_pct,
            reward_risk_ratio,
            commission_per_leg,
            fx_rate,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check all documented ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.capital > 0.0) {
            return Err(SettingsError::NonPositiveCapital(self.capital));
        }
        if !(self.risk_pct > 0.0 && self.risk_pct <= 100.0) {
            return Err(SettingsError::RiskPctOutOfRange(self.risk_pct));
        }
        if !(self.reward_risk_ratio > 0.0) {
            return Err(SettingsError::NonPositiveRewardRisk(self.reward_risk_ratio));
        }
        if !(self.commission_per_leg >= 0.0) {
            return Err(SettingsError::NegativeCommission(self.commission_per_leg));
        }
        if !(self.fx_rate > 0.0) {
            return Err(SettingsError::NonPositiveFxRate(self.fx_rate));
        }
        Ok(())
    }
}

impl Default for AccountSettings {
    /// Retail defaults: 10k capital, 1.5% risk per trade, 1:2 reward:risk,
    /// 3.95 commission per leg, EUR/USD around 1.08.
    fn default() -> Self {
        Self {
            capital: 10_000.0,
            risk_pct: 1.5,
            reward_risk_ratio: 2.0,
            commission_per_leg: 3.95,
            fx_rate: 1.08,
        }
    }
}
