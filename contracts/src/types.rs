//! Common types used across the ARSX protocol.

use odra::casper_types::U256;
use odra::prelude::*;

/// Mutable risk parameters, read fresh on every health-factor computation.
#[odra::odra_type]
#[derive(Copy)]
pub struct RiskParameters {
    /// Fraction of collateral value counted toward solvency (percent, e.g. 50)
    pub liquidation_threshold: u64,
    /// Extra collateral fraction awarded to liquidators (percent, e.g. 10)
    pub liquidation_bonus: u64,
}

/// Aggregated account position as reported by the engine.
#[odra::odra_type]
pub struct AccountSummary {
    /// Outstanding ARSX debt attributed to the account
    pub total_arsx_minted: U256,
    /// USD value of all deposited collateral (scaled by 1e18)
    pub collateral_value_usd: U256,
}
