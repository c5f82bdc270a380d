//! Capability Directory Contract
//!
//! Single authorization point for the protocol. Maps (role, account) pairs to
//! granted/not granted and answers synchronous checks for six capabilities:
//! - minter / burner: stable-asset ledger mint and burn
//! - price-updater: oracle feed writes
//! - risk-admin: liquidation parameter changes
//! - config-admin: role grants and engine configuration
//! - emergency-admin: pause switch
//!
//! The stable-asset ledger, the oracle update path, the engine's governance
//! setters, and the peg stability module all delegate authorization here so
//! role grants are managed in one place.

use crate::errors::ArsxError;
use odra::prelude::*;

/// Role constants (u8 for efficient storage)
pub const ROLE_MINTER: u8 = 0;
pub const ROLE_BURNER: u8 = 1;
pub const ROLE_PRICE_UPDATER: u8 = 2;
pub const ROLE_RISK_ADMIN: u8 = 3;
pub const ROLE_CONFIG_ADMIN: u8 = 4;
pub const ROLE_EMERGENCY_ADMIN: u8 = 5;

/// Number of distinct roles
pub const ROLE_COUNT: u8 = 6;

/// Emitted when a role is granted to an account
#[odra::event]
pub struct RoleGranted {
    pub role: u8,
    pub account: Address,
}

/// Emitted when a role is revoked from an account
#[odra::event]
pub struct RoleRevoked {
    pub role: u8,
    pub account: Address,
}

/// Capability Directory Contract
#[odra::module(events = [RoleGranted, RoleRevoked])]
pub struct CapabilityDirectory {
    /// Role assignments: (role, account) -> bool
    roles: Mapping<(u8, Address), bool>,
    /// Number of accounts holding each role
    role_count: Mapping<u8, u32>,
}

#[odra::module]
impl CapabilityDirectory {
    /// Initialize the directory with an initial config-admin.
    pub fn init(&mut self, initial_admin: Address) {
        self.set_role_internal(ROLE_CONFIG_ADMIN, initial_admin, true);
        self.env().emit_event(RoleGranted {
            role: ROLE_CONFIG_ADMIN,
            account: initial_admin,
        });
    }

    // ========== Role Query Functions ==========

    /// Check if an account has a specific role
    pub fn has_role(&self, role: u8, account: Address) -> bool {
        self.roles.get(&(role, account)).unwrap_or(false)
    }

    /// Get the number of accounts holding a role
    pub fn get_role_member_count(&self, role: u8) -> u32 {
        self.role_count.get(&role).unwrap_or(0)
    }

    // ========== Role Management Functions ==========

    /// Grant a role to an account (config-admin only)
    pub fn grant_role(&mut self, role: u8, account: Address) {
        self.require_config_admin();
        if role >= ROLE_COUNT {
            self.env().revert(ArsxError::UnknownRole);
        }

        if self.has_role(role, account) {
            return; // Already granted
        }

        self.set_role_internal(role, account, true);
        self.env().emit_event(RoleGranted { role, account });
    }

    /// Revoke a role from an account (config-admin only)
    pub fn revoke_role(&mut self, role: u8, account: Address) {
        self.require_config_admin();
        if role >= ROLE_COUNT {
            self.env().revert(ArsxError::UnknownRole);
        }

        if !self.has_role(role, account) {
            return; // Not granted
        }

        // The directory must never become unadministrable
        if role == ROLE_CONFIG_ADMIN && self.get_role_member_count(ROLE_CONFIG_ADMIN) <= 1 {
            self.env().revert(ArsxError::LastConfigAdmin);
        }

        self.set_role_internal(role, account, false);
        self.env().emit_event(RoleRevoked { role, account });
    }

    // ========== Capability Checks (for other contracts) ==========

    /// Revert unless the account holds the minter capability
    pub fn check_minter(&self, account: Address) {
        if !self.has_role(ROLE_MINTER, account) {
            self.env().revert(ArsxError::MissingMinterRole);
        }
    }

    /// Revert unless the account holds the burner capability
    pub fn check_burner(&self, account: Address) {
        if !self.has_role(ROLE_BURNER, account) {
            self.env().revert(ArsxError::MissingBurnerRole);
        }
    }

    /// Revert unless the account holds the price-updater capability
    pub fn check_price_updater(&self, account: Address) {
        if !self.has_role(ROLE_PRICE_UPDATER, account) {
            self.env().revert(ArsxError::MissingPriceUpdaterRole);
        }
    }

    /// Revert unless the account holds the risk-admin capability
    pub fn check_risk_admin(&self, account: Address) {
        if !self.has_role(ROLE_RISK_ADMIN, account) {
            self.env().revert(ArsxError::MissingRiskAdminRole);
        }
    }

    /// Revert unless the account holds the config-admin capability
    pub fn check_config_admin(&self, account: Address) {
        if !self.has_role(ROLE_CONFIG_ADMIN, account) {
            self.env().revert(ArsxError::MissingConfigAdminRole);
        }
    }

    /// Revert unless the account holds the emergency-admin capability
    pub fn check_emergency_admin(&self, account: Address) {
        if !self.has_role(ROLE_EMERGENCY_ADMIN, account) {
            self.env().revert(ArsxError::MissingEmergencyAdminRole);
        }
    }

    // ========== Internal Functions ==========

    fn require_config_admin(&self) {
        self.check_config_admin(self.env().caller());
    }

    fn set_role_internal(&mut self, role: u8, account: Address, value: bool) {
        let had_role = self.roles.get(&(role, account)).unwrap_or(false);

        self.roles.set(&(role, account), value);

        let current_count = self.role_count.get(&role).unwrap_or(0);
        if value && !had_role {
            self.role_count.set(&role, current_count + 1);
        } else if !value && had_role && current_count > 0 {
            self.role_count.set(&role, current_count - 1);
        }
    }
}
