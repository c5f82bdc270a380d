//! ARSX Protocol Contracts
//!
//! Peso-pegged, crypto-collateralized stablecoin protocol.
//!
//! ## Architecture
//!
//! - **ArsxEngine**: Collateral custody, debt ledger, health factor
//!   enforcement, liquidations
//! - **ArsxToken**: CEP-18 stablecoin with capability-gated mint/burn
//! - **PriceFeed**: Per-asset exchange rate feeds with freshness gating
//! - **CapabilityDirectory**: Role grants and capability checks for the
//!   whole protocol
//! - **PegStabilityModule**: Oracle-priced collateral/ARSX swap venue for
//!   peg arbitrage
//! - **CollateralToken**: Plain CEP-18 token for test networks
//!
//! ## Pause Switch
//!
//! The emergency-admin can pause the engine:
//! - Allowed: deposit collateral, repay debt
//! - Blocked: mint, redeem, liquidation

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod errors;
pub mod types;

// Contract modules
pub mod collateral_token;
pub mod directory;
pub mod engine;
pub mod oracle;
pub mod psm;
pub mod token;

pub use collateral_token::CollateralToken;
pub use directory::CapabilityDirectory;
pub use engine::ArsxEngine;
pub use oracle::PriceFeed;
pub use psm::PegStabilityModule;
pub use token::ArsxToken;
