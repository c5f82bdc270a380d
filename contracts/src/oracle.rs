//! Price Feed Contract
//!
//! One instance is deployed per exchange rate the protocol consumes: one for
//! each allow-listed collateral asset (asset/USD) and one for the stable asset
//! itself (peso/USD). A feed holds a single scaled rate and its last update
//! time. Writes are gated by the price-updater capability; reads either return
//! a rate proven fresh against a caller-supplied window or fail, so consumers
//! never act on stale or zero data.

use crate::errors::ArsxError;
use odra::casper_types::{runtime_args, U256};
use odra::prelude::*;
use odra::CallDef;

/// Decimals used for all feed rates (1e8 scale)
pub const FEED_DECIMALS: u8 = 8;

/// Emitted on every accepted rate write
#[odra::event]
pub struct RateUpdated {
    pub rate: U256,
    pub timestamp: u64,
}

/// Price Feed Contract
#[odra::module(events = [RateUpdated])]
pub struct PriceFeed {
    /// Capability directory address
    directory: Var<Address>,
    /// Current rate, scaled by 1e8
    rate: Var<U256>,
    /// Block time of the last accepted write
    last_update: Var<u64>,
}

#[odra::module]
impl PriceFeed {
    /// Initialize the feed with a starting rate.
    pub fn init(&mut self, directory: Address, initial_rate: U256) {
        let now = self.env().get_block_time();
        self.directory.set(directory);
        self.rate.set(initial_rate);
        self.last_update.set(now);
    }

    /// Write a new rate (price-updater capability required).
    ///
    /// A zero rate is accepted at write time (feed adapters are raw) and
    /// rejected at read time by `latest_valid_data`.
    pub fn update_rate(&mut self, rate: U256) {
        self.require_price_updater();

        let now = self.env().get_block_time();
        self.rate.set(rate);
        self.last_update.set(now);

        self.env().emit_event(RateUpdated {
            rate,
            timestamp: now,
        });
    }

    /// Return the rate if it is fresher than `max_age`, otherwise revert.
    ///
    /// `max_age` is expressed in host block-time units. Fails with
    /// `OracleStale` past the window and `OracleZeroRate` on a zero rate, so
    /// any consuming operation aborts instead of proceeding on bad data.
    pub fn latest_valid_data(&self, max_age: u64) -> U256 {
        let (rate, last_update) = self.latest_data();

        let now = self.env().get_block_time();
        if now.saturating_sub(last_update) > max_age {
            self.env().revert(ArsxError::OracleStale);
        }
        if rate.is_zero() {
            self.env().revert(ArsxError::OracleZeroRate);
        }

        rate
    }

    /// Return the raw (rate, timestamp) pair without freshness checks.
    pub fn latest_data(&self) -> (U256, u64) {
        let rate = self.rate.get().unwrap_or(U256::zero());
        let last_update = self.last_update.get().unwrap_or(0);
        (rate, last_update)
    }

    /// Whether the reading is older than `max_age`.
    pub fn is_stale(&self, max_age: u64) -> bool {
        let last_update = self.last_update.get().unwrap_or(0);
        self.env().get_block_time().saturating_sub(last_update) > max_age
    }

    /// Rate decimals (always 8)
    pub fn decimals(&self) -> u8 {
        FEED_DECIMALS
    }

    // ========== Internal Functions ==========

    fn require_price_updater(&self) {
        let caller = self.env().caller();
        let directory = match self.directory.get() {
            Some(addr) => addr,
            None => self.env().revert(ArsxError::InvalidConfig),
        };

        let args = runtime_args! {
            "account" => caller
        };
        let call_def = CallDef::new("check_price_updater", false, args);
        self.env().call_contract::<()>(directory, call_def);
    }
}
