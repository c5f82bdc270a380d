//! Protocol error definitions.

use odra::prelude::*;

/// ARSX protocol errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArsxError {
    // Input validation errors (1xx)
    AmountZero = 100,
    CollateralNotAllowed = 101,
    TokenFeedLengthMismatch = 102,

    // Oracle errors (2xx)
    OracleStale = 200,
    OracleZeroRate = 201,

    // Solvency errors (3xx)
    BreaksHealthFactor = 300,
    PositionHealthy = 301,
    PositionNotImproved = 302,

    // Authorization errors (4xx)
    MissingMinterRole = 400,
    MissingBurnerRole = 401,
    MissingPriceUpdaterRole = 402,
    MissingRiskAdminRole = 403,
    MissingConfigAdminRole = 404,
    MissingEmergencyAdminRole = 405,
    UnknownRole = 406,
    LastConfigAdmin = 407,

    // Token errors (5xx)
    InsufficientBalance = 500,
    InsufficientAllowance = 501,
    InsufficientCollateral = 502,
    TokenTransferFailed = 503,
    RepayExceedsDebt = 504,

    // Peg stability errors (6xx)
    RedeemThresholdExceeded = 600,
    InsufficientBuffer = 601,

    // Guard errors (7xx)
    ReentrantCall = 700,
    EnginePaused = 701,

    // Configuration errors (9xx)
    InvalidConfig = 900,
    ThresholdOutOfBounds = 901,
    BonusOutOfBounds = 902,
}

impl ArsxError {
    pub const fn message(&self) -> &'static str {
        match self {
            // Input validation
            ArsxError::AmountZero => "Amount must be greater than zero",
            ArsxError::CollateralNotAllowed => "Collateral asset is not allow-listed",
            ArsxError::TokenFeedLengthMismatch => {
                "Collateral token and price feed lists must have the same length"
            }

            // Oracle
            ArsxError::OracleStale => "Oracle reading is older than the freshness window",
            ArsxError::OracleZeroRate => "Oracle rate is zero",

            // Solvency
            ArsxError::BreaksHealthFactor => "Operation would break the minimum health factor",
            ArsxError::PositionHealthy => "Position is healthy, nothing to liquidate",
            ArsxError::PositionNotImproved => "Liquidation did not improve the position",

            // Authorization
            ArsxError::MissingMinterRole => "Account lacks the minter capability",
            ArsxError::MissingBurnerRole => "Account lacks the burner capability",
            ArsxError::MissingPriceUpdaterRole => "Account lacks the price-updater capability",
            ArsxError::MissingRiskAdminRole => "Account lacks the risk-admin capability",
            ArsxError::MissingConfigAdminRole => "Account lacks the config-admin capability",
            ArsxError::MissingEmergencyAdminRole => {
                "Account lacks the emergency-admin capability"
            }
            ArsxError::UnknownRole => "Unknown role identifier",
            ArsxError::LastConfigAdmin => "Cannot revoke the last config-admin",

            // Token
            ArsxError::InsufficientBalance => "Insufficient token balance",
            ArsxError::InsufficientAllowance => "Insufficient token allowance",
            ArsxError::InsufficientCollateral => "Insufficient collateral balance",
            ArsxError::TokenTransferFailed => "Token transfer failed",
            ArsxError::RepayExceedsDebt => "Repay amount exceeds outstanding debt",

            // Peg stability
            ArsxError::RedeemThresholdExceeded => {
                "Swap exceeds the redeemable fraction of the collateral buffer"
            }
            ArsxError::InsufficientBuffer => "Insufficient collateral buffer",

            // Guards
            ArsxError::ReentrantCall => "Reentrant call into the engine",
            ArsxError::EnginePaused => "Operation blocked: engine paused",

            // Configuration
            ArsxError::InvalidConfig => "Invalid configuration parameter",
            ArsxError::ThresholdOutOfBounds => "Liquidation threshold out of bounds",
            ArsxError::BonusOutOfBounds => "Liquidation bonus out of bounds",
        }
    }
}

impl core::fmt::Display for ArsxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<ArsxError> for OdraError {
    fn from(error: ArsxError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error as u16)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error as u16, error.message())
        }
    }
}
