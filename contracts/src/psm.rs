//! Peg Stability Module
//!
//! Direct swap venue between one collateral asset and ARSX at oracle prices,
//! minus a basis-point fee. Arbitrageurs use it to pull ARSX back to the peso
//! peg: buy cheap ARSX here when it trades below peg, sell ARSX here when it
//! trades above. Redemptions are capped to a fraction of the collateral
//! buffer per swap so the module cannot be drained in one transaction.
//!
//! Fees are implicit: swapped-in collateral stays in the buffer in full while
//! the ARSX side of the quote is haircut, so the buffer accretes over time.

use crate::errors::ArsxError;
use odra::casper_types::{runtime_args, U256};
use odra::prelude::*;
use odra::CallDef;

/// Basis-point denominator
const BPS_SCALE: u64 = 10_000;
/// Internal USD scale (1e18)
const PRECISION: u128 = 1_000_000_000_000_000_000;
/// Bridges 1e8 feed rates up to the 1e18 scale
const ADDITIONAL_FEED_PRECISION: u128 = 10_000_000_000;
/// Percent denominator for the redeem threshold
const THRESHOLD_PRECISION: u64 = 100;

/// Default swap fee: 50 bps (0.5%)
const DEFAULT_FEE_BPS: u64 = 50;
/// Default redeemable fraction of the buffer per swap (percent)
const DEFAULT_REDEEM_THRESHOLD: u64 = 50;
/// Default oracle freshness window: 1 hour in milliseconds
const DEFAULT_ORACLE_MAX_AGE: u64 = 3_600_000;

/// Emitted when collateral is swapped in for freshly minted ARSX
#[odra::event]
pub struct CollateralSwappedForArsx {
    pub account: Address,
    pub collateral_in: U256,
    pub arsx_out: U256,
}

/// Emitted when ARSX is swapped in and burned for buffered collateral
#[odra::event]
pub struct ArsxSwappedForCollateral {
    pub account: Address,
    pub arsx_in: U256,
    pub collateral_out: U256,
}

/// Peg Stability Module Contract
#[odra::module(events = [CollateralSwappedForArsx, ArsxSwappedForCollateral])]
pub struct PegStabilityModule {
    /// Capability directory address
    directory: Var<Address>,
    /// ARSX stablecoin address
    arsx_token: Var<Address>,
    /// The single collateral asset this module trades
    collateral_token: Var<Address>,
    /// Collateral/USD feed address
    collateral_feed: Var<Address>,
    /// Peso/USD feed address
    peso_usd_feed: Var<Address>,
    /// Swap fee in basis points
    fee_bps: Var<u64>,
    /// Redeemable fraction of the buffer per swap (percent)
    redeem_threshold: Var<u64>,
    /// Oracle freshness window (block-time units)
    oracle_max_age: Var<u64>,
    /// Collateral held by the module
    collateral_buffer: Var<U256>,
}

#[odra::module]
impl PegStabilityModule {
    /// Initialize the module for one collateral asset.
    pub fn init(
        &mut self,
        directory: Address,
        arsx_token: Address,
        collateral_token: Address,
        collateral_feed: Address,
        peso_usd_feed: Address,
    ) {
        self.directory.set(directory);
        self.arsx_token.set(arsx_token);
        self.collateral_token.set(collateral_token);
        self.collateral_feed.set(collateral_feed);
        self.peso_usd_feed.set(peso_usd_feed);
        self.fee_bps.set(DEFAULT_FEE_BPS);
        self.redeem_threshold.set(DEFAULT_REDEEM_THRESHOLD);
        self.oracle_max_age.set(DEFAULT_ORACLE_MAX_AGE);
        self.collateral_buffer.set(U256::zero());
    }

    // ========== Swaps ==========

    /// Swap collateral for ARSX at oracle prices, minus the fee. The
    /// collateral is pulled into the buffer and the net ARSX minted.
    pub fn swap_collateral_for_arsx(&mut self, collateral_amount: U256) {
        if collateral_amount.is_zero() {
            self.env().revert(ArsxError::AmountZero);
        }

        let arsx_out = self.quote_arsx_out(collateral_amount);
        let caller = self.env().caller();

        self.pull_collateral(caller, collateral_amount);
        let buffer = self.get_collateral_buffer();
        self.collateral_buffer.set(buffer + collateral_amount);

        self.mint_arsx(caller, arsx_out);

        self.env().emit_event(CollateralSwappedForArsx {
            account: caller,
            collateral_in: collateral_amount,
            arsx_out,
        });
    }

    /// Swap ARSX for buffered collateral at oracle prices, minus the fee.
    /// The ARSX is burned; the payout is capped to the redeemable fraction of
    /// the buffer.
    pub fn swap_arsx_for_collateral(&mut self, arsx_amount: U256) {
        if arsx_amount.is_zero() {
            self.env().revert(ArsxError::AmountZero);
        }

        let collateral_out = self.quote_collateral_out(arsx_amount);
        let buffer = self.get_collateral_buffer();

        let redeemable = buffer * U256::from(self.get_redeem_threshold())
            / U256::from(THRESHOLD_PRECISION);
        if collateral_out > redeemable {
            self.env().revert(ArsxError::RedeemThresholdExceeded);
        }
        if collateral_out > buffer {
            self.env().revert(ArsxError::InsufficientBuffer);
        }

        let caller = self.env().caller();
        self.burn_arsx(caller, arsx_amount);
        self.collateral_buffer.set(buffer - collateral_out);
        self.push_collateral(caller, collateral_out);

        self.env().emit_event(ArsxSwappedForCollateral {
            account: caller,
            arsx_in: arsx_amount,
            collateral_out,
        });
    }

    // ========== Quotes ==========

    /// ARSX received for `collateral_amount`, net of the fee
    pub fn quote_arsx_out(&self, collateral_amount: U256) -> U256 {
        let collateral_rate = self.feed_rate(self.collateral_feed_address());
        let peso_rate = self.feed_rate(self.peso_feed_address());

        // collateral -> USD -> peso-denominated ARSX
        let usd_value = collateral_amount * collateral_rate
            * U256::from(ADDITIONAL_FEED_PRECISION)
            / U256::from(PRECISION);
        let gross = usd_value * U256::from(PRECISION)
            / (peso_rate * U256::from(ADDITIONAL_FEED_PRECISION));

        self.apply_fee(gross)
    }

    /// Collateral received for `arsx_amount`, net of the fee
    pub fn quote_collateral_out(&self, arsx_amount: U256) -> U256 {
        let collateral_rate = self.feed_rate(self.collateral_feed_address());
        let peso_rate = self.feed_rate(self.peso_feed_address());

        // ARSX -> USD -> collateral
        let usd_value = arsx_amount * peso_rate * U256::from(ADDITIONAL_FEED_PRECISION)
            / U256::from(PRECISION);
        let gross = usd_value * U256::from(PRECISION)
            / (collateral_rate * U256::from(ADDITIONAL_FEED_PRECISION));

        self.apply_fee(gross)
    }

    // ========== Governance ==========

    /// Update the swap fee (config-admin only)
    pub fn set_fee(&mut self, fee_bps: u64) {
        self.require_config_admin();
        if fee_bps >= BPS_SCALE {
            self.env().revert(ArsxError::InvalidConfig);
        }
        self.fee_bps.set(fee_bps);
    }

    /// Update the redeemable buffer fraction (config-admin only)
    pub fn set_redeem_threshold(&mut self, redeem_threshold: u64) {
        self.require_config_admin();
        if redeem_threshold == 0 || redeem_threshold > THRESHOLD_PRECISION {
            self.env().revert(ArsxError::InvalidConfig);
        }
        self.redeem_threshold.set(redeem_threshold);
    }

    /// Update the oracle freshness window (config-admin only)
    pub fn set_oracle_freshness(&mut self, max_age: u64) {
        self.require_config_admin();
        if max_age == 0 {
            self.env().revert(ArsxError::InvalidConfig);
        }
        self.oracle_max_age.set(max_age);
    }

    // ========== View Functions ==========

    /// Current swap fee in basis points
    pub fn get_fee_bps(&self) -> u64 {
        self.fee_bps.get().unwrap_or(DEFAULT_FEE_BPS)
    }

    /// Current redeemable buffer fraction (percent)
    pub fn get_redeem_threshold(&self) -> u64 {
        self.redeem_threshold.get().unwrap_or(DEFAULT_REDEEM_THRESHOLD)
    }

    /// Current oracle freshness window
    pub fn get_oracle_max_age(&self) -> u64 {
        self.oracle_max_age.get().unwrap_or(DEFAULT_ORACLE_MAX_AGE)
    }

    /// Collateral currently buffered by the module
    pub fn get_collateral_buffer(&self) -> U256 {
        self.collateral_buffer.get().unwrap_or(U256::zero())
    }

    // ========== Internal Functions ==========

    fn apply_fee(&self, gross: U256) -> U256 {
        gross * U256::from(BPS_SCALE - self.get_fee_bps()) / U256::from(BPS_SCALE)
    }

    fn collateral_feed_address(&self) -> Address {
        match self.collateral_feed.get() {
            Some(addr) => addr,
            None => self.env().revert(ArsxError::InvalidConfig),
        }
    }

    fn peso_feed_address(&self) -> Address {
        match self.peso_usd_feed.get() {
            Some(addr) => addr,
            None => self.env().revert(ArsxError::InvalidConfig),
        }
    }

    fn feed_rate(&self, feed: Address) -> U256 {
        let args = runtime_args! {
            "max_age" => self.get_oracle_max_age()
        };
        let call_def = CallDef::new("latest_valid_data", false, args);
        self.env().call_contract::<U256>(feed, call_def)
    }

    fn require_config_admin(&self) {
        let caller = self.env().caller();
        let directory = match self.directory.get() {
            Some(addr) => addr,
            None => self.env().revert(ArsxError::InvalidConfig),
        };

        let args = runtime_args! {
            "account" => caller
        };
        let call_def = CallDef::new("check_config_admin", false, args);
        self.env().call_contract::<()>(directory, call_def);
    }

    fn pull_collateral(&mut self, owner: Address, amount: U256) {
        let token = match self.collateral_token.get() {
            Some(addr) => addr,
            None => self.env().revert(ArsxError::InvalidConfig),
        };
        let module = self.env().self_address();
        let args = runtime_args! {
            "owner" => owner,
            "recipient" => module,
            "amount" => amount
        };
        let call_def = CallDef::new("transfer_from", true, args);
        let ok: bool = self.env().call_contract(token, call_def);
        if !ok {
            self.env().revert(ArsxError::TokenTransferFailed);
        }
    }

    fn push_collateral(&mut self, recipient: Address, amount: U256) {
        let token = match self.collateral_token.get() {
            Some(addr) => addr,
            None => self.env().revert(ArsxError::InvalidConfig),
        };
        let args = runtime_args! {
            "recipient" => recipient,
            "amount" => amount
        };
        let call_def = CallDef::new("transfer", true, args);
        let ok: bool = self.env().call_contract(token, call_def);
        if !ok {
            self.env().revert(ArsxError::TokenTransferFailed);
        }
    }

    fn mint_arsx(&mut self, recipient: Address, amount: U256) {
        let arsx = match self.arsx_token.get() {
            Some(addr) => addr,
            None => self.env().revert(ArsxError::InvalidConfig),
        };
        let args = runtime_args! {
            "to" => recipient,
            "amount" => amount
        };
        let call_def = CallDef::new("mint", true, args);
        self.env().call_contract::<()>(arsx, call_def);
    }

    fn burn_arsx(&mut self, owner: Address, amount: U256) {
        let arsx = match self.arsx_token.get() {
            Some(addr) => addr,
            None => self.env().revert(ArsxError::InvalidConfig),
        };
        let args = runtime_args! {
            "from" => owner,
            "amount" => amount
        };
        let call_def = CallDef::new("burn_with_allowance", true, args);
        self.env().call_contract::<()>(arsx, call_def);
    }
}
