//! Collateral & Solvency Engine
//!
//! Core of the protocol: holds all deposited collateral, tracks per-account
//! debt, enforces over-collateralization through the health factor, and runs
//! liquidations. Every state-mutating operation is wrapped in a reentrancy
//! lock and follows pull-before-credit / debit-before-push ordering so the
//! internal ledger never disagrees with token balances mid-operation.
//!
//! Valuation pipeline: collateral amounts (1e18 scale) are priced through
//! per-asset USD feeds (1e8 scale), debt in ARSX is priced through the
//! peso/USD feed, and both sides meet in 1e18-scaled USD terms where the
//! health factor is computed.

use crate::errors::ArsxError;
use crate::types::{AccountSummary, RiskParameters};
use odra::casper_types::{runtime_args, U256};
use odra::prelude::*;
use odra::CallDef;

/// Internal USD scale (1e18)
const PRECISION: u128 = 1_000_000_000_000_000_000;
/// Bridges 1e8 feed rates up to the 1e18 scale
const ADDITIONAL_FEED_PRECISION: u128 = 10_000_000_000;
/// Percent denominator for threshold and bonus
const LIQUIDATION_PRECISION: u64 = 100;
/// Health factor floor, 1e18-scaled (1.0)
pub const MIN_HEALTH_FACTOR: u128 = 1_000_000_000_000_000_000;

/// Liquidation threshold bounds (percent)
const MIN_LIQUIDATION_THRESHOLD: u64 = 50;
const MAX_LIQUIDATION_THRESHOLD: u64 = 85;
/// Liquidation bonus bounds (percent)
const MIN_LIQUIDATION_BONUS: u64 = 5;
const MAX_LIQUIDATION_BONUS: u64 = 20;

/// Default risk parameters
const DEFAULT_LIQUIDATION_THRESHOLD: u64 = 50;
const DEFAULT_LIQUIDATION_BONUS: u64 = 10;
/// Default oracle freshness window: 1 hour in milliseconds
const DEFAULT_ORACLE_MAX_AGE: u64 = 3_600_000;

/// Emitted when collateral is credited to an account
#[odra::event]
pub struct CollateralDeposited {
    pub account: Address,
    pub token: Address,
    pub amount: U256,
}

/// Emitted when collateral leaves the engine, including liquidation seizures
/// (`from` is the debited account, `to` the recipient)
#[odra::event]
pub struct CollateralRedeemed {
    pub from: Address,
    pub to: Address,
    pub token: Address,
    pub amount: U256,
}

/// Emitted when the risk-admin changes liquidation parameters
#[odra::event]
pub struct LiquidationParametersUpdated {
    pub liquidation_threshold: u64,
    pub liquidation_bonus: u64,
}

/// Emitted when the config-admin changes the oracle freshness window
#[odra::event]
pub struct OracleFreshnessUpdated {
    pub max_age: u64,
}

/// Collateral & Solvency Engine Contract
#[odra::module(events = [CollateralDeposited, CollateralRedeemed, LiquidationParametersUpdated, OracleFreshnessUpdated])]
pub struct ArsxEngine {
    /// Capability directory address
    directory: Var<Address>,
    /// ARSX stablecoin address
    arsx_token: Var<Address>,
    /// Peso/USD feed address (prices ARSX debt)
    peso_usd_feed: Var<Address>,
    /// Allow-listed collateral tokens, fixed at deployment
    collateral_tokens: Var<Vec<Address>>,
    /// Collateral token -> its USD price feed
    price_feeds: Mapping<Address, Address>,
    /// (account, token) -> deposited amount
    collateral_deposited: Mapping<(Address, Address), U256>,
    /// account -> outstanding ARSX debt
    arsx_minted: Mapping<Address, U256>,
    /// Fraction of collateral value counted toward solvency (percent)
    liquidation_threshold: Var<u64>,
    /// Extra collateral awarded to liquidators (percent)
    liquidation_bonus: Var<u64>,
    /// Oracle freshness window (block-time units)
    oracle_max_age: Var<u64>,
    /// Reentrancy lock
    locked: Var<bool>,
    /// Pause switch (blocks mint/redeem/liquidate)
    paused: Var<bool>,
}

#[odra::module]
impl ArsxEngine {
    /// Initialize the engine with a parallel collateral/feed allow-list.
    pub fn init(
        &mut self,
        directory: Address,
        arsx_token: Address,
        peso_usd_feed: Address,
        collateral_tokens: Vec<Address>,
        price_feeds: Vec<Address>,
    ) {
        if collateral_tokens.len() != price_feeds.len() {
            self.env().revert(ArsxError::TokenFeedLengthMismatch);
        }

        self.directory.set(directory);
        self.arsx_token.set(arsx_token);
        self.peso_usd_feed.set(peso_usd_feed);

        for (token, feed) in collateral_tokens.iter().zip(price_feeds.iter()) {
            self.price_feeds.set(token, *feed);
        }
        self.collateral_tokens.set(collateral_tokens);

        self.liquidation_threshold.set(DEFAULT_LIQUIDATION_THRESHOLD);
        self.liquidation_bonus.set(DEFAULT_LIQUIDATION_BONUS);
        self.oracle_max_age.set(DEFAULT_ORACLE_MAX_AGE);
        self.locked.set(false);
        self.paused.set(false);
    }

    // ========== Core Operations ==========

    /// Deposit collateral into the engine. The token is pulled via
    /// `transfer_from` before the ledger is credited, so a failed pull leaves
    /// no phantom balance. Allowed while paused.
    pub fn deposit_collateral(&mut self, token: Address, amount: U256) {
        self.enter();
        self.deposit_internal(token, amount);
        self.leave();
    }

    /// Mint ARSX against deposited collateral. Debt is recorded first, then
    /// the caller's ending health factor is checked, then tokens are minted.
    pub fn mint_arsx(&mut self, amount: U256) {
        self.require_not_paused();
        self.enter();
        self.mint_arsx_internal(amount);
        self.leave();
    }

    /// Deposit collateral and mint ARSX in one atomic operation.
    pub fn deposit_collateral_and_mint_arsx(
        &mut self,
        token: Address,
        collateral_amount: U256,
        arsx_amount: U256,
    ) {
        self.require_not_paused();
        self.enter();
        self.deposit_internal(token, collateral_amount);
        self.mint_arsx_internal(arsx_amount);
        self.leave();
    }

    /// Withdraw collateral. The ledger is debited before the token is pushed,
    /// and the caller's ending health factor must stay above the floor.
    pub fn redeem_collateral(&mut self, token: Address, amount: U256) {
        self.require_not_paused();
        self.enter();
        let caller = self.env().caller();
        self.redeem_internal(caller, caller, token, amount);
        self.assert_health(caller);
        self.leave();
    }

    /// Repay ARSX debt. The caller must have approved the engine; the tokens
    /// are burned and the debt ledger decremented. Allowed while paused.
    pub fn burn_arsx(&mut self, amount: U256) {
        self.enter();
        self.burn_arsx_internal(amount);
        self.leave();
    }

    /// Repay debt and withdraw collateral in one atomic operation.
    pub fn redeem_collateral_for_arsx(
        &mut self,
        token: Address,
        collateral_amount: U256,
        arsx_amount: U256,
    ) {
        self.require_not_paused();
        self.enter();
        let caller = self.env().caller();
        self.burn_arsx_internal(arsx_amount);
        self.redeem_internal(caller, caller, token, collateral_amount);
        self.assert_health(caller);
        self.leave();
    }

    /// Liquidate an unhealthy position. The caller repays `debt_to_cover`
    /// ARSX on behalf of `account` and seizes the equivalent collateral plus
    /// the liquidation bonus. The position's health factor must not decrease,
    /// and the liquidator's own position must stay healthy.
    pub fn liquidate(&mut self, token: Address, account: Address, debt_to_cover: U256) {
        self.require_not_paused();
        self.enter();

        self.require_positive(debt_to_cover);
        self.require_allowed(token);

        let starting_health_factor = self.health_factor_of(account);
        if starting_health_factor >= U256::from(MIN_HEALTH_FACTOR) {
            self.env().revert(ArsxError::PositionHealthy);
        }

        let debt = self.arsx_minted.get(&account).unwrap_or(U256::zero());
        if debt < debt_to_cover {
            self.env().revert(ArsxError::RepayExceedsDebt);
        }

        // Covered debt -> USD -> collateral token amount, plus the bonus
        let debt_usd = self.debt_value_usd(debt_to_cover);
        let token_amount = self.token_amount_at(token, debt_usd);
        let bonus = token_amount * U256::from(self.get_liquidation_bonus())
            / U256::from(LIQUIDATION_PRECISION);
        let seize_amount = token_amount + bonus;

        let deposited = self
            .collateral_deposited
            .get(&(account, token))
            .unwrap_or(U256::zero());
        if deposited < seize_amount {
            self.env().revert(ArsxError::InsufficientCollateral);
        }

        let liquidator = self.env().caller();
        self.redeem_internal(account, liquidator, token, seize_amount);

        // Pull and burn the repaid ARSX from the liquidator, retire the debt
        self.burn_from(liquidator, debt_to_cover);
        self.arsx_minted.set(&account, debt - debt_to_cover);

        let ending_health_factor = self.health_factor_of(account);
        if ending_health_factor < starting_health_factor {
            self.env().revert(ArsxError::PositionNotImproved);
        }

        self.assert_health(liquidator);
        self.leave();
    }

    // ========== Governance ==========

    /// Update liquidation parameters (risk-admin only)
    pub fn set_liquidation_parameters(
        &mut self,
        liquidation_threshold: u64,
        liquidation_bonus: u64,
    ) {
        self.require_capability("check_risk_admin");

        if liquidation_threshold < MIN_LIQUIDATION_THRESHOLD
            || liquidation_threshold > MAX_LIQUIDATION_THRESHOLD
        {
            self.env().revert(ArsxError::ThresholdOutOfBounds);
        }
        if liquidation_bonus < MIN_LIQUIDATION_BONUS || liquidation_bonus > MAX_LIQUIDATION_BONUS {
            self.env().revert(ArsxError::BonusOutOfBounds);
        }

        self.liquidation_threshold.set(liquidation_threshold);
        self.liquidation_bonus.set(liquidation_bonus);

        self.env().emit_event(LiquidationParametersUpdated {
            liquidation_threshold,
            liquidation_bonus,
        });
    }

    /// Update the oracle freshness window (config-admin only)
    pub fn set_oracle_freshness(&mut self, max_age: u64) {
        self.require_capability("check_config_admin");

        if max_age == 0 {
            self.env().revert(ArsxError::InvalidConfig);
        }

        self.oracle_max_age.set(max_age);
        self.env().emit_event(OracleFreshnessUpdated { max_age });
    }

    /// Pause mint/redeem/liquidate (emergency-admin only). Deposits and debt
    /// repayment stay open so users can always de-risk.
    pub fn pause(&mut self) {
        self.require_capability("check_emergency_admin");
        self.paused.set(true);
    }

    /// Resume normal operation (emergency-admin only)
    pub fn unpause(&mut self) {
        self.require_capability("check_emergency_admin");
        self.paused.set(false);
    }

    // ========== View Functions ==========

    /// Health factor of an account, 1e18-scaled. U256::MAX with zero debt.
    pub fn get_health_factor(&self, account: Address) -> U256 {
        self.health_factor_of(account)
    }

    /// Debt and total collateral value of an account
    pub fn get_account_information(&self, account: Address) -> AccountSummary {
        AccountSummary {
            total_arsx_minted: self.arsx_minted.get(&account).unwrap_or(U256::zero()),
            collateral_value_usd: self.collateral_value_usd(account),
        }
    }

    /// Total USD value of an account's collateral across all assets
    pub fn get_account_collateral_value(&self, account: Address) -> U256 {
        self.collateral_value_usd(account)
    }

    /// USD value (1e18 scale) of `amount` of a collateral token
    pub fn get_usd_value(&self, token: Address, amount: U256) -> U256 {
        self.usd_value_at(token, amount)
    }

    /// Collateral token amount equivalent to a 1e18-scaled USD value
    pub fn get_token_amount_from_usd(&self, token: Address, usd_value: U256) -> U256 {
        self.token_amount_at(token, usd_value)
    }

    /// Deposited collateral of an account for one token
    pub fn get_collateral_balance_of_user(&self, account: Address, token: Address) -> U256 {
        self.collateral_deposited
            .get(&(account, token))
            .unwrap_or(U256::zero())
    }

    /// The fixed collateral allow-list
    pub fn get_collateral_tokens(&self) -> Vec<Address> {
        self.collateral_tokens.get().unwrap_or_default()
    }

    /// Current risk parameters
    pub fn get_risk_parameters(&self) -> RiskParameters {
        RiskParameters {
            liquidation_threshold: self.get_liquidation_threshold(),
            liquidation_bonus: self.get_liquidation_bonus(),
        }
    }

    /// Current liquidation threshold (percent)
    pub fn get_liquidation_threshold(&self) -> u64 {
        self.liquidation_threshold
            .get()
            .unwrap_or(DEFAULT_LIQUIDATION_THRESHOLD)
    }

    /// Current liquidation bonus (percent)
    pub fn get_liquidation_bonus(&self) -> u64 {
        self.liquidation_bonus
            .get()
            .unwrap_or(DEFAULT_LIQUIDATION_BONUS)
    }

    /// Current oracle freshness window
    pub fn get_oracle_max_age(&self) -> u64 {
        self.oracle_max_age.get().unwrap_or(DEFAULT_ORACLE_MAX_AGE)
    }

    /// Whether the pause switch is engaged
    pub fn is_paused(&self) -> bool {
        self.paused.get().unwrap_or(false)
    }

    // ========== Internal: Guards ==========

    fn enter(&mut self) {
        if self.locked.get().unwrap_or(false) {
            self.env().revert(ArsxError::ReentrantCall);
        }
        self.locked.set(true);
    }

    fn leave(&mut self) {
        self.locked.set(false);
    }

    fn require_not_paused(&self) {
        if self.is_paused() {
            self.env().revert(ArsxError::EnginePaused);
        }
    }

    fn require_positive(&self, amount: U256) {
        if amount.is_zero() {
            self.env().revert(ArsxError::AmountZero);
        }
    }

    fn require_allowed(&self, token: Address) -> Address {
        match self.price_feeds.get(&token) {
            Some(feed) => feed,
            None => self.env().revert(ArsxError::CollateralNotAllowed),
        }
    }

    fn require_capability(&self, entry_point: &str) {
        let caller = self.env().caller();
        let directory = match self.directory.get() {
            Some(addr) => addr,
            None => self.env().revert(ArsxError::InvalidConfig),
        };

        let args = runtime_args! {
            "account" => caller
        };
        let call_def = CallDef::new(entry_point, false, args);
        self.env().call_contract::<()>(directory, call_def);
    }

    // ========== Internal: Valuation ==========

    fn feed_rate(&self, feed: Address) -> U256 {
        let args = runtime_args! {
            "max_age" => self.get_oracle_max_age()
        };
        let call_def = CallDef::new("latest_valid_data", false, args);
        self.env().call_contract::<U256>(feed, call_def)
    }

    fn usd_value_at(&self, token: Address, amount: U256) -> U256 {
        let feed = self.require_allowed(token);
        let rate = self.feed_rate(feed);
        amount * rate * U256::from(ADDITIONAL_FEED_PRECISION) / U256::from(PRECISION)
    }

    fn token_amount_at(&self, token: Address, usd_value: U256) -> U256 {
        let feed = self.require_allowed(token);
        let rate = self.feed_rate(feed);
        if rate.is_zero() {
            self.env().revert(ArsxError::OracleZeroRate);
        }
        usd_value * U256::from(PRECISION) / (rate * U256::from(ADDITIONAL_FEED_PRECISION))
    }

    /// USD value of ARSX debt through the peso/USD feed
    fn debt_value_usd(&self, debt: U256) -> U256 {
        let feed = match self.peso_usd_feed.get() {
            Some(addr) => addr,
            None => self.env().revert(ArsxError::InvalidConfig),
        };
        let rate = self.feed_rate(feed);
        debt * rate * U256::from(ADDITIONAL_FEED_PRECISION) / U256::from(PRECISION)
    }

    fn collateral_value_usd(&self, account: Address) -> U256 {
        let tokens = self.collateral_tokens.get().unwrap_or_default();
        let mut total = U256::zero();
        for token in tokens {
            let amount = self
                .collateral_deposited
                .get(&(account, token))
                .unwrap_or(U256::zero());
            if !amount.is_zero() {
                total += self.usd_value_at(token, amount);
            }
        }
        total
    }

    fn health_factor_of(&self, account: Address) -> U256 {
        let debt = self.arsx_minted.get(&account).unwrap_or(U256::zero());
        if debt.is_zero() {
            return U256::MAX;
        }

        let debt_usd = self.debt_value_usd(debt);
        if debt_usd.is_zero() {
            return U256::MAX;
        }

        let collateral_usd = self.collateral_value_usd(account);
        let adjusted = collateral_usd * U256::from(self.get_liquidation_threshold())
            / U256::from(LIQUIDATION_PRECISION);
        adjusted * U256::from(PRECISION) / debt_usd
    }

    fn assert_health(&self, account: Address) {
        if self.health_factor_of(account) < U256::from(MIN_HEALTH_FACTOR) {
            self.env().revert(ArsxError::BreaksHealthFactor);
        }
    }

    // ========== Internal: Token Movement ==========

    fn pull_collateral(&mut self, token: Address, owner: Address, amount: U256) {
        let engine = self.env().self_address();
        let args = runtime_args! {
            "owner" => owner,
            "recipient" => engine,
            "amount" => amount
        };
        let call_def = CallDef::new("transfer_from", true, args);
        let ok: bool = self.env().call_contract(token, call_def);
        if !ok {
            self.env().revert(ArsxError::TokenTransferFailed);
        }
    }

    fn push_collateral(&mut self, token: Address, recipient: Address, amount: U256) {
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

    fn mint_to(&mut self, recipient: Address, amount: U256) {
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

    fn burn_from(&mut self, owner: Address, amount: U256) {
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

    // ========== Internal: Ledger ==========

    fn credit_collateral(&mut self, account: Address, token: Address, amount: U256) {
        let current = self
            .collateral_deposited
            .get(&(account, token))
            .unwrap_or(U256::zero());
        self.collateral_deposited.set(&(account, token), current + amount);
    }

    fn debit_collateral(&mut self, account: Address, token: Address, amount: U256) {
        let current = self
            .collateral_deposited
            .get(&(account, token))
            .unwrap_or(U256::zero());
        if current < amount {
            self.env().revert(ArsxError::InsufficientCollateral);
        }
        self.collateral_deposited.set(&(account, token), current - amount);
    }

    // ========== Internal: Operations ==========

    fn deposit_internal(&mut self, token: Address, amount: U256) {
        self.require_positive(amount);
        self.require_allowed(token);

        let caller = self.env().caller();

        // Pull before credit: the ledger only reflects tokens actually held
        self.pull_collateral(token, caller, amount);
        self.credit_collateral(caller, token, amount);

        self.env().emit_event(CollateralDeposited {
            account: caller,
            token,
            amount,
        });
    }

    fn mint_arsx_internal(&mut self, amount: U256) {
        self.require_positive(amount);

        let caller = self.env().caller();
        let current = self.arsx_minted.get(&caller).unwrap_or(U256::zero());
        self.arsx_minted.set(&caller, current + amount);

        self.assert_health(caller);
        self.mint_to(caller, amount);
    }

    fn burn_arsx_internal(&mut self, amount: U256) {
        self.require_positive(amount);

        let caller = self.env().caller();
        let current = self.arsx_minted.get(&caller).unwrap_or(U256::zero());
        if current < amount {
            self.env().revert(ArsxError::RepayExceedsDebt);
        }

        self.burn_from(caller, amount);
        self.arsx_minted.set(&caller, current - amount);

        // Repaying can only raise the health factor; kept as a backstop
        self.assert_health(caller);
    }

    fn redeem_internal(&mut self, from: Address, to: Address, token: Address, amount: U256) {
        self.require_positive(amount);
        self.require_allowed(token);

        // Debit before push: a failed transfer reverts the debit with it
        self.debit_collateral(from, token, amount);
        self.push_collateral(token, to, amount);

        self.env().emit_event(CollateralRedeemed {
            from,
            to,
            token,
            amount,
        });
    }
}
