//! Single-writer concurrency wrapper.
//!
//! The ledger's execution model is serialized and atomic per operation:
//! every mutating entry point appears to run in full or not at all, with a
//! total order imposed externally. [`SharedLedger`] provides that guarantee
//! outside a blockchain runtime with one mutex held for the duration of
//! each operation. There is no intra-operation suspension and nothing to
//! cancel, so a plain mutex is the whole story.

use parking_lot::Mutex;

use tithe_core::error::TitheError;
use tithe_core::types::{
    AccountId, Amount, Contribution, ContributionId, DonorState, PeriodIndex, RewardPeriod, Tick,
};

use crate::ledger::Ledger;

/// Thread-safe handle around a [`Ledger`].
pub struct SharedLedger {
    inner: Mutex<Ledger>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Mutex::new(ledger),
        }
    }

    /// Run a read-only closure against the ledger under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn donate(
        &self,
        caller: AccountId,
        amount: Amount,
        now: Tick,
    ) -> Result<ContributionId, TitheError> {
        self.inner.lock().donate(caller, amount, now)
    }

    pub fn donate_on_behalf(
        &self,
        payer: AccountId,
        donor: AccountId,
        amount: Amount,
        now: Tick,
    ) -> Result<ContributionId, TitheError> {
        self.inner.lock().donate_on_behalf(payer, donor, amount, now)
    }

    pub fn claim_rewards(&self, donor: AccountId, now: Tick) -> Result<Amount, TitheError> {
        self.inner.lock().claim_rewards(donor, now)
    }

    pub fn claim_rewards_up_to(
        &self,
        donor: AccountId,
        bound: PeriodIndex,
        now: Tick,
    ) -> Result<Amount, TitheError> {
        self.inner.lock().claim_rewards_up_to(donor, bound, now)
    }

    pub fn ensure_period_materialized(&self, now: Tick) -> Result<u64, TitheError> {
        self.inner.lock().ensure_period_materialized(now)
    }

    pub fn update_reward_period_params(
        &self,
        caller: AccountId,
        period_length: u64,
        decay_numerator: u128,
        decay_denominator: u128,
        now: Tick,
    ) -> Result<(), TitheError> {
        self.inner.lock().update_reward_period_params(
            caller,
            period_length,
            decay_numerator,
            decay_denominator,
            now,
        )
    }

    pub fn update_claim_delay(
        &self,
        caller: AccountId,
        periods: u64,
        now: Tick,
    ) -> Result<(), TitheError> {
        self.inner.lock().update_claim_delay(caller, periods, now)
    }

    pub fn update_smoothing_window(
        &self,
        caller: AccountId,
        size: u64,
        now: Tick,
    ) -> Result<(), TitheError> {
        self.inner.lock().update_smoothing_window(caller, size, now)
    }

    pub fn reward_period_count(&self) -> PeriodIndex {
        self.inner.lock().reward_period_count()
    }

    pub fn reward_period(&self, index: PeriodIndex) -> Option<RewardPeriod> {
        self.inner.lock().reward_period(index).cloned()
    }

    pub fn reward_period_donor_amount(&self, period: PeriodIndex, donor: &AccountId) -> Amount {
        self.inner.lock().reward_period_donor_amount(period, donor)
    }

    pub fn donor(&self, account: &AccountId) -> Option<DonorState> {
        self.inner.lock().donor(account).cloned()
    }

    pub fn contribution(&self, id: ContributionId) -> Option<Contribution> {
        self.inner.lock().contribution(id).cloned()
    }

    pub fn contribution_count(&self) -> u64 {
        self.inner.lock().contribution_count()
    }

    pub fn calculate_claimable(&self, donor: &AccountId, now: Tick) -> Result<Amount, TitheError> {
        self.inner.lock().calculate_claimable(donor, now)
    }

    pub fn estimate_claimable(&self, donor: &AccountId, now: Tick) -> Result<Amount, TitheError> {
        self.inner.lock().estimate_claimable(donor, now)
    }

    pub fn calculate_claimable_by_period(
        &self,
        donor: &AccountId,
        bound: PeriodIndex,
        now: Tick,
    ) -> Result<Amount, TitheError> {
        self.inner
            .lock()
            .calculate_claimable_by_period(donor, bound, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tithe_core::constants::COIN;
    use tithe_core::params::{GenesisConfig, LedgerParameters};
    use tithe_core::vault::MemoryVault;

    fn acct(seed: u8) -> AccountId {
        AccountId([seed; 32])
    }

    fn shared() -> (Arc<SharedLedger>, Arc<MemoryVault>) {
        let vault = Arc::new(MemoryVault::new());
        for seed in 1..=8 {
            vault.mint_stable(&acct(seed), 1_000_000 * COIN);
        }
        let ledger = Ledger::new(
            GenesisConfig {
                genesis_tick: 130,
                initial_reward_per_tick: 216_000 * COIN,
                params: LedgerParameters {
                    period_length: 20,
                    ..LedgerParameters::default()
                },
            },
            acct(0xEE),
            acct(0xDD),
            vault.clone(),
        )
        .unwrap();
        (Arc::new(SharedLedger::new(ledger)), vault)
    }

    #[test]
    fn operations_work_through_the_lock() {
        let (ledger, vault) = shared();
        ledger.donate(acct(1), 100 * COIN, 131).unwrap();
        assert_eq!(ledger.contribution_count(), 1);
        let paid = ledger.claim_rewards(acct(1), 150).unwrap();
        assert_eq!(paid, 4_320_000 * COIN);
        assert_eq!(vault.reward_balance(&acct(1)), 4_320_000 * COIN);
    }

    #[test]
    fn concurrent_donors_are_serialized() {
        let (ledger, _) = shared();
        let mut handles = Vec::new();
        for seed in 1..=8u8 {
            let ledger = Arc::clone(&ledger);
            handles.push(std::thread::spawn(move || {
                ledger.donate(acct(seed), 100 * COIN, 140).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ledger.contribution_count(), 8);
        let total = ledger.read(|l| l.reward_period(1).unwrap().contributions_amount);
        assert_eq!(total, 800 * COIN);
        // The contribution log is gap-free regardless of interleaving.
        for id in 1..=8 {
            assert_eq!(ledger.contribution(id).unwrap().id, id);
        }
    }
}
