//! Value-transfer seam between the ledger and the token system.
//!
//! The ledger never touches token mechanics directly: contributions are
//! pulled in and rewards paid out through [`ValueTransfer`]. The reference
//! deployment backs this with on-chain token contracts; tests use
//! [`MemoryVault`], and replay uses [`NullVault`] (replaying a log must not
//! re-move funds).

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::TokenError;
use crate::types::{AccountId, Amount};

/// Moves value on behalf of the ledger.
///
/// `collect` requires prior authorization of the payer, exactly like an
/// ERC-20 allowance; implementations reject unauthorized or underfunded
/// transfers with [`TokenError`] and must leave balances untouched on error.
pub trait ValueTransfer: Send + Sync {
    /// Pull `amount` of the contributed asset from `from` into `to`.
    fn collect(&self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<(), TokenError>;

    /// Pay out `amount` of the reward token to `to`.
    fn distribute(&self, to: &AccountId, amount: Amount) -> Result<(), TokenError>;
}

/// In-memory token balances for tests.
///
/// Tracks the contributed (stable) asset and the reward token separately.
/// Reward payouts are minted on distribution, mirroring an emission-style
/// reward token. Not suitable for production use.
#[derive(Default)]
pub struct MemoryVault {
    stable: Mutex<HashMap<AccountId, Amount>>,
    rewards: Mutex<HashMap<AccountId, Amount>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `account` with `amount` of the contributed asset.
    pub fn mint_stable(&self, account: &AccountId, amount: Amount) {
        *self.stable.lock().entry(*account).or_insert(0) += amount;
    }

    /// Balance of the contributed asset.
    pub fn stable_balance(&self, account: &AccountId) -> Amount {
        self.stable.lock().get(account).copied().unwrap_or(0)
    }

    /// Balance of the reward token.
    pub fn reward_balance(&self, account: &AccountId) -> Amount {
        self.rewards.lock().get(account).copied().unwrap_or(0)
    }

    /// Total reward tokens distributed so far.
    pub fn rewards_distributed(&self) -> Amount {
        self.rewards.lock().values().sum()
    }
}

impl ValueTransfer for MemoryVault {
    fn collect(&self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<(), TokenError> {
        let mut stable = self.stable.lock();
        let have = stable.get(from).copied().unwrap_or(0);
        if have < amount {
            return Err(TokenError::InsufficientBalance { have, need: amount });
        }
        *stable.get_mut(from).expect("balance checked above") = have - amount;
        *stable.entry(*to).or_insert(0) += amount;
        Ok(())
    }

    fn distribute(&self, to: &AccountId, amount: Amount) -> Result<(), TokenError> {
        *self.rewards.lock().entry(*to).or_insert(0) += amount;
        Ok(())
    }
}

/// A vault that accepts every transfer without moving anything.
///
/// Used when replaying an event log: the funds already moved when the
/// events were recorded live.
pub struct NullVault;

impl ValueTransfer for NullVault {
    fn collect(&self, _from: &AccountId, _to: &AccountId, _amount: Amount) -> Result<(), TokenError> {
        Ok(())
    }

    fn distribute(&self, _to: &AccountId, _amount: Amount) -> Result<(), TokenError> {
        Ok(())
    }
}
