//! The ledger facade: donations, claims, reads, and governance.
//!
//! A [`Ledger`] is one protocol instance: one parameter history, one period
//! table, one contribution log. Every operation takes the current tick as
//! an explicit argument — the ledger never reads a clock — and every
//! mutating operation materializes periods up to that tick before doing
//! anything else. External callers impose a total order on mutating calls;
//! a tick regression across mutating operations is a programming error and
//! asserts.
//!
//! Mutations are atomic: validation and token transfers run before any
//! ledger state changes, so a failed operation leaves no partial effects.

use std::sync::Arc;

use tracing::{debug, info};

use tithe_core::error::{ClaimError, ContributionError, GovernanceError, TitheError};
use tithe_core::params::{GenesisConfig, LedgerParameters, ParamsHistory};
use tithe_core::types::{
    AccountId, Amount, Contribution, ContributionId, DonorState, PeriodIndex, RewardPeriod, Tick,
};
use tithe_core::vault::ValueTransfer;

use crate::claims;
use crate::contributions::ContributionTable;
use crate::periods::PeriodTable;
use crate::replay::LedgerEvent;

/// A single reward-ledger instance.
pub struct Ledger {
    genesis: GenesisConfig,
    history: ParamsHistory,
    periods: PeriodTable,
    contributions: ContributionTable,
    events: Vec<LedgerEvent>,
    treasury: AccountId,
    governor: AccountId,
    vault: Arc<dyn ValueTransfer>,
    last_event_tick: Tick,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("genesis", &self.genesis)
            .field("last_event_tick", &self.last_event_tick)
            .finish_non_exhaustive()
    }
}

impl Ledger {
    /// Create a ledger from a validated genesis configuration.
    pub fn new(
        genesis: GenesisConfig,
        treasury: AccountId,
        governor: AccountId,
        vault: Arc<dyn ValueTransfer>,
    ) -> Result<Self, TitheError> {
        genesis.validate()?;
        let periods = PeriodTable::bootstrap(&genesis)?;
        Ok(Self {
            history: ParamsHistory::new(genesis.genesis_tick, genesis.params),
            genesis,
            periods,
            contributions: ContributionTable::new(),
            events: Vec::new(),
            treasury,
            governor,
            vault,
            last_event_tick: genesis.genesis_tick,
        })
    }

    // ------------------------------------------------------------------
    // Mutating operations
    // ------------------------------------------------------------------

    /// Materialize every period up to the one containing `now`.
    ///
    /// Idempotent; returns the number of periods created. All other
    /// mutating operations call this first.
    pub fn ensure_period_materialized(&mut self, now: Tick) -> Result<u64, TitheError> {
        Ok(self.periods.ensure_materialized(now, &self.history)?)
    }

    /// Donate `amount` on the caller's own behalf.
    ///
    /// Requires prior authorization to move `amount` of the contributed
    /// asset; the value lands in the treasury and the caller is credited.
    pub fn donate(
        &mut self,
        caller: AccountId,
        amount: Amount,
        now: Tick,
    ) -> Result<ContributionId, TitheError> {
        self.donate_on_behalf(caller, caller, amount, now)
    }

    /// Donate `amount` paid by `payer`, crediting `donor`.
    pub fn donate_on_behalf(
        &mut self,
        payer: AccountId,
        donor: AccountId,
        amount: Amount,
        now: Tick,
    ) -> Result<ContributionId, TitheError> {
        if amount == 0 {
            return Err(ContributionError::ZeroAmount.into());
        }
        self.check_tick_order(now);
        self.ensure_period_materialized(now)?;
        let period_index = self.periods.period_index_at(now, &self.history);

        self.vault.collect(&payer, &self.treasury, amount)?;

        self.periods.add_contribution(period_index, amount)?;
        let id = self
            .contributions
            .record(donor, self.treasury, period_index, now, amount);
        self.events.push(LedgerEvent::Contribution {
            payer,
            donor,
            amount,
            tick: now,
        });
        self.last_event_tick = now;
        debug!(
            id,
            donor = %donor,
            amount = %amount,
            period = period_index,
            "recorded contribution"
        );
        Ok(id)
    }

    /// Claim every matured, unclaimed period for `donor`.
    ///
    /// Pays out through the vault and advances the donor's cursor to the
    /// delay-adjusted current period. Fails with
    /// [`ClaimError::NothingToClaim`] — and changes nothing — when the
    /// computed amount is zero.
    pub fn claim_rewards(&mut self, donor: AccountId, now: Tick) -> Result<Amount, TitheError> {
        self.check_tick_order(now);
        self.ensure_period_materialized(now)?;
        let up_to = self.claimable_until(now);
        self.execute_claim(donor, up_to, now)
    }

    /// Claim like [`claim_rewards`](Self::claim_rewards), but cap the upper
    /// period bound at `bound`.
    pub fn claim_rewards_up_to(
        &mut self,
        donor: AccountId,
        bound: PeriodIndex,
        now: Tick,
    ) -> Result<Amount, TitheError> {
        self.check_tick_order(now);
        self.ensure_period_materialized(now)?;
        let upper = self.claimable_until(now);
        let lower = self.last_claimed(&donor);
        if bound < lower || bound > upper {
            return Err(ClaimError::InvalidPeriodBound {
                requested: bound,
                lower,
                upper,
            }
            .into());
        }
        self.execute_claim(donor, bound, now)
    }

    fn execute_claim(
        &mut self,
        donor: AccountId,
        up_to: PeriodIndex,
        now: Tick,
    ) -> Result<Amount, TitheError> {
        let from = self.last_claimed(&donor) + 1;
        let amount = claims::claimable_in_range(
            &self.periods,
            &self.contributions,
            &self.history,
            &donor,
            from,
            up_to,
        )?;
        if amount == 0 {
            return Err(ClaimError::NothingToClaim.into());
        }
        self.vault.distribute(&donor, amount)?;

        let state = self.contributions.donor_mut(&donor);
        state.last_claimed_period = up_to;
        state.last_claim_tick = now;
        self.events.push(LedgerEvent::Claim {
            donor,
            up_to,
            amount,
            tick: now,
        });
        self.last_event_tick = now;
        info!(donor = %donor, amount = %amount, up_to, "claimed rewards");
        Ok(amount)
    }

    // ------------------------------------------------------------------
    // Governance
    // ------------------------------------------------------------------

    /// Update period length and decay factor. Governor only; affects
    /// periods starting after `now`.
    pub fn update_reward_period_params(
        &mut self,
        caller: AccountId,
        period_length: u64,
        decay_numerator: u128,
        decay_denominator: u128,
        now: Tick,
    ) -> Result<(), TitheError> {
        self.require_governor(&caller)?;
        let params = LedgerParameters {
            period_length,
            decay_numerator,
            decay_denominator,
            ..*self.history.current()
        };
        self.apply_param_change(params, now)
    }

    /// Update the claim delay. Governor only; gates all claims from `now`
    /// onward.
    pub fn update_claim_delay(
        &mut self,
        caller: AccountId,
        claim_delay_periods: u64,
        now: Tick,
    ) -> Result<(), TitheError> {
        self.require_governor(&caller)?;
        let params = LedgerParameters {
            claim_delay_periods,
            ..*self.history.current()
        };
        self.apply_param_change(params, now)
    }

    /// Update the smoothing window. Governor only; affects periods
    /// starting after `now`, never already-materialized records.
    pub fn update_smoothing_window(
        &mut self,
        caller: AccountId,
        smoothing_window_size: u64,
        now: Tick,
    ) -> Result<(), TitheError> {
        self.require_governor(&caller)?;
        let params = LedgerParameters {
            smoothing_window_size,
            ..*self.history.current()
        };
        self.apply_param_change(params, now)
    }

    pub(crate) fn apply_param_change(
        &mut self,
        params: LedgerParameters,
        now: Tick,
    ) -> Result<(), TitheError> {
        params.validate()?;
        self.check_tick_order(now);
        self.history.record(now, params);
        self.events.push(LedgerEvent::ParamChange { params, tick: now });
        self.last_event_tick = now;
        info!(
            period_length = params.period_length,
            claim_delay = params.claim_delay_periods,
            smoothing_window = params.smoothing_window_size,
            tick = now,
            "ledger parameters updated"
        );
        Ok(())
    }

    fn require_governor(&self, caller: &AccountId) -> Result<(), GovernanceError> {
        if *caller != self.governor {
            return Err(GovernanceError::NotGovernor);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    /// Number of materialized reward periods.
    pub fn reward_period_count(&self) -> PeriodIndex {
        self.periods.count()
    }

    /// A materialized reward period by 1-based index.
    pub fn reward_period(&self, index: PeriodIndex) -> Option<&RewardPeriod> {
        self.periods.get(index)
    }

    /// Amount `donor` contributed in `period`.
    pub fn reward_period_donor_amount(&self, period: PeriodIndex, donor: &AccountId) -> Amount {
        self.contributions.donor_amount_in(period, donor)
    }

    /// Donor cursor, if the account has ever contributed.
    pub fn donor(&self, account: &AccountId) -> Option<&DonorState> {
        self.contributions.donor(account)
    }

    /// A contribution log row by 1-based id.
    pub fn contribution(&self, id: ContributionId) -> Option<&Contribution> {
        self.contributions.get(id)
    }

    /// Number of contributions recorded.
    pub fn contribution_count(&self) -> u64 {
        self.contributions.count()
    }

    /// Period index containing `now` (projected past the table if needed).
    pub fn current_period_index(&self, now: Tick) -> PeriodIndex {
        self.periods.period_index_at(now, &self.history)
    }

    /// Matured, unclaimed rewards for `donor` as of `now`.
    ///
    /// Covers periods from the donor's cursor through the delay-adjusted
    /// current period. Returns 0 — never an error — when no period is
    /// eligible.
    pub fn calculate_claimable(&self, donor: &AccountId, now: Tick) -> Result<Amount, TitheError> {
        let from = self.last_claimed(donor) + 1;
        let to = self.claimable_until(now);
        Ok(claims::claimable_in_range(
            &self.periods,
            &self.contributions,
            &self.history,
            donor,
            from,
            to,
        )?)
    }

    /// Forward-looking preview: rewards accrued in periods still inside
    /// the claim delay, plus the open period. Disjoint from
    /// [`calculate_claimable`](Self::calculate_claimable).
    pub fn estimate_claimable(&self, donor: &AccountId, now: Tick) -> Result<Amount, TitheError> {
        let current = self.current_period_index(now);
        let from = (self.claimable_until(now) + 1).max(self.last_claimed(donor) + 1);
        Ok(claims::claimable_in_range(
            &self.periods,
            &self.contributions,
            &self.history,
            donor,
            from,
            current,
        )?)
    }

    /// Cumulative claimable through `bound` (inclusive), ignoring the
    /// claim delay: the amount a claim at that period boundary would have
    /// paid. Audit/replay view.
    pub fn calculate_claimable_by_period(
        &self,
        donor: &AccountId,
        bound: PeriodIndex,
        now: Tick,
    ) -> Result<Amount, TitheError> {
        let completed = self.current_period_index(now).saturating_sub(1);
        if bound == 0 || bound > completed {
            return Err(ClaimError::InvalidPeriodBound {
                requested: bound,
                lower: 1,
                upper: completed,
            }
            .into());
        }
        let from = self.last_claimed(donor) + 1;
        Ok(claims::claimable_in_range(
            &self.periods,
            &self.contributions,
            &self.history,
            donor,
            from,
            bound,
        )?)
    }

    /// Parameters currently in force.
    pub fn parameters(&self) -> &LedgerParameters {
        self.history.current()
    }

    /// The immutable genesis configuration.
    pub fn genesis(&self) -> &GenesisConfig {
        &self.genesis
    }

    /// The append-only event log, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn treasury(&self) -> &AccountId {
        &self.treasury
    }

    pub fn governor(&self) -> &AccountId {
        &self.governor
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Highest period claimable at `now`: the last completed period minus
    /// the claim delay in force at `now`. The open period never qualifies.
    fn claimable_until(&self, now: Tick) -> PeriodIndex {
        let delay = self.history.at(now).claim_delay_periods;
        self.current_period_index(now).saturating_sub(1 + delay)
    }

    fn last_claimed(&self, donor: &AccountId) -> PeriodIndex {
        self.contributions
            .donor(donor)
            .map(|d| d.last_claimed_period)
            .unwrap_or(0)
    }

    fn check_tick_order(&self, now: Tick) {
        assert!(
            now >= self.last_event_tick,
            "tick {now} precedes already-recorded tick {}; mutating calls must be externally ordered",
            self.last_event_tick
        );
    }
}
