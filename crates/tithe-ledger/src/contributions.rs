//! Contribution table: the append-only donation log, per-period donor
//! totals, and the donor registry.
//!
//! This table never rejects a well-formed row; amount validation and period
//! materialization are the caller's responsibility (the ledger facade
//! always materializes up to "now" before recording).

use std::collections::HashMap;

use tithe_core::constants::UNIT_PRICE_ONE;
use tithe_core::error::MathError;
use tithe_core::math;
use tithe_core::types::{
    AccountId, Amount, Contribution, ContributionId, DonorState, PeriodIndex, Tick,
};

/// Append-only contribution log plus point-lookup indexes.
#[derive(Default)]
pub struct ContributionTable {
    log: Vec<Contribution>,
    /// period → donor → amount contributed in that period.
    by_period: HashMap<PeriodIndex, HashMap<AccountId, Amount>>,
    donors: HashMap<AccountId, DonorState>,
}

impl ContributionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contributions recorded.
    pub fn count(&self) -> u64 {
        self.log.len() as u64
    }

    /// Look up a contribution by its 1-based id.
    pub fn get(&self, id: ContributionId) -> Option<&Contribution> {
        if id == 0 {
            return None;
        }
        self.log.get(id as usize - 1)
    }

    /// The full log, oldest first.
    pub fn log(&self) -> &[Contribution] {
        &self.log
    }

    /// Amount `donor` contributed in `period`. O(1).
    pub fn donor_amount_in(&self, period: PeriodIndex, donor: &AccountId) -> Amount {
        self.by_period
            .get(&period)
            .and_then(|m| m.get(donor))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of `donor`'s contributions over the inclusive period range.
    pub fn donor_amount_in_range(
        &self,
        donor: &AccountId,
        from: PeriodIndex,
        to: PeriodIndex,
    ) -> Result<Amount, MathError> {
        let mut total = 0u128;
        for period in from..=to {
            total = math::add(total, self.donor_amount_in(period, donor))?;
        }
        Ok(total)
    }

    /// Donor cursor, if the account has ever contributed.
    pub fn donor(&self, account: &AccountId) -> Option<&DonorState> {
        self.donors.get(account)
    }

    /// Number of distinct donors ever seen.
    pub fn donor_count(&self) -> usize {
        self.donors.len()
    }

    pub(crate) fn donor_mut(&mut self, account: &AccountId) -> &mut DonorState {
        self.donors.entry(*account).or_default()
    }

    /// Append a contribution row and update the indexes.
    ///
    /// Bumps the donor's `contribution_period_count` only the first time
    /// this donor appears in this period. Infallible by design: all
    /// validation happens before this point.
    pub(crate) fn record(
        &mut self,
        donor: AccountId,
        target: AccountId,
        period_index: PeriodIndex,
        tick: Tick,
        amount: Amount,
    ) -> ContributionId {
        let id = self.log.len() as u64 + 1;
        self.log.push(Contribution {
            id,
            donor,
            target,
            period_index,
            tick,
            amount,
            unit_of_account_price: UNIT_PRICE_ONE,
        });

        let per_donor = self.by_period.entry(period_index).or_default();
        let first_in_period = !per_donor.contains_key(&donor);
        *per_donor.entry(donor).or_insert(0) += amount;

        let state = self.donors.entry(donor).or_default();
        if first_in_period {
            state.contribution_period_count += 1;
        }

        id
    }
}
