//! Reward period table: lazy, ordered, idempotent materialization and the
//! tick → period mapping.
//!
//! Periods are append-only. A period's record is frozen at materialization
//! (only `contributions_amount` accumulates while the period is current),
//! and the parameters used to build it are the ones in force at its start
//! tick — never the parameters at the moment materialization happens to
//! run. Reads that reach past the materialized table use [`Projection`],
//! which applies the exact same construction rules, so a later
//! materialization always agrees with an earlier virtual view.

use tithe_core::error::MathError;
use tithe_core::math;
use tithe_core::params::{GenesisConfig, ParamsHistory};
use tithe_core::types::{Amount, PeriodIndex, RewardPeriod, Tick};

use crate::schedule;
use crate::smoothing;

/// The materialized reward periods, 1-based and gap-free.
pub struct PeriodTable {
    periods: Vec<RewardPeriod>,
}

impl PeriodTable {
    /// Create the table with period 1 materialized from genesis.
    pub fn bootstrap(genesis: &GenesisConfig) -> Result<Self, MathError> {
        let params = &genesis.params;
        let reward_amount =
            schedule::period_pool(genesis.initial_reward_per_tick, params.period_length)?;
        Ok(Self {
            periods: vec![RewardPeriod {
                index: 1,
                reward_per_tick: genesis.initial_reward_per_tick,
                reward_amount,
                start_tick: genesis.genesis_tick,
                end_tick: genesis.genesis_tick + params.period_length - 1,
                contributions_amount: 0,
                smoothing_window: params.smoothing_window_size,
            }],
        })
    }

    /// Number of materialized periods.
    pub fn count(&self) -> PeriodIndex {
        self.periods.len() as u64
    }

    /// Look up a materialized period by 1-based index.
    pub fn get(&self, index: PeriodIndex) -> Option<&RewardPeriod> {
        if index == 0 {
            return None;
        }
        self.periods.get(index as usize - 1)
    }

    /// The most recently materialized period.
    pub fn last(&self) -> &RewardPeriod {
        self.periods.last().expect("period 1 exists from bootstrap")
    }

    /// First tick of period 1.
    pub fn genesis_tick(&self) -> Tick {
        self.periods[0].start_tick
    }

    /// Period index containing `tick`.
    ///
    /// Total and monotonic for `tick ≥ genesis`; indices past the
    /// materialized table are projected from the parameter history.
    /// Ticks before genesis are a programming error.
    pub fn period_index_at(&self, tick: Tick, history: &ParamsHistory) -> PeriodIndex {
        assert!(
            tick >= self.genesis_tick(),
            "tick {tick} precedes genesis tick {}",
            self.genesis_tick()
        );
        let last = self.last();
        if tick <= last.end_tick {
            let pos = self.periods.partition_point(|p| p.end_tick < tick);
            return self.periods[pos].index;
        }
        let mut index = last.index;
        let mut end = last.end_tick;
        while end < tick {
            let start = end + 1;
            index += 1;
            end = start + history.at(start).period_length - 1;
        }
        index
    }

    /// Materialize every period up to the one containing `now`, in order.
    ///
    /// Idempotent: re-invoking for the same tick creates nothing and
    /// re-decays nothing. Returns the number of periods created.
    pub fn ensure_materialized(
        &mut self,
        now: Tick,
        history: &ParamsHistory,
    ) -> Result<u64, MathError> {
        assert!(
            now >= self.genesis_tick(),
            "tick {now} precedes genesis tick {}",
            self.genesis_tick()
        );
        let mut created = 0;
        while self.last().end_tick < now {
            let next = self
                .project_from(history)
                .next()
                .expect("projection is unbounded")?;
            tracing::debug!(
                index = next.index,
                reward_per_tick = %next.reward_per_tick,
                reward_amount = %next.reward_amount,
                start_tick = next.start_tick,
                end_tick = next.end_tick,
                "materialized reward period"
            );
            self.periods.push(RewardPeriod {
                index: next.index,
                reward_per_tick: next.reward_per_tick,
                reward_amount: next.reward_amount,
                start_tick: next.start_tick,
                end_tick: next.end_tick,
                contributions_amount: 0,
                smoothing_window: next.smoothing_window,
            });
            created += 1;
        }
        Ok(created)
    }

    /// Whether any period in the inclusive range (clamped to the
    /// materialized table) has contributions.
    pub fn any_contributions_in(&self, from: PeriodIndex, to: PeriodIndex) -> bool {
        let from = from.max(1);
        let to = to.min(self.count());
        (from..=to).any(|i| self.periods[i as usize - 1].contributions_amount > 0)
    }

    /// Total contributions over the inclusive range (clamped to the
    /// materialized table).
    pub fn total_contributions_in(
        &self,
        from: PeriodIndex,
        to: PeriodIndex,
    ) -> Result<Amount, MathError> {
        let from = from.max(1);
        let to = to.min(self.count());
        let mut total = 0u128;
        for i in from..=to {
            total = math::add(total, self.periods[i as usize - 1].contributions_amount)?;
        }
        Ok(total)
    }

    /// Record a contribution amount against the current period.
    pub(crate) fn add_contribution(
        &mut self,
        index: PeriodIndex,
        amount: Amount,
    ) -> Result<(), MathError> {
        assert_eq!(
            index,
            self.count(),
            "contributions may only target the current period"
        );
        let period = &mut self.periods[index as usize - 1];
        period.contributions_amount = math::add(period.contributions_amount, amount)?;
        Ok(())
    }

    /// Virtual periods after the materialized table, in index order.
    pub fn project_from<'a>(&'a self, history: &'a ParamsHistory) -> Projection<'a> {
        let last = self.last();
        Projection {
            table: self,
            history,
            prev_index: last.index,
            prev_rate: last.reward_per_tick,
            prev_end: last.end_tick,
            prev_pool: last.reward_amount,
            prev_window: last.smoothing_window,
            failed: false,
        }
    }
}

/// A not-yet-materialized period as reads observe it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectedPeriod {
    pub index: PeriodIndex,
    pub reward_per_tick: Amount,
    pub reward_amount: Amount,
    pub start_tick: Tick,
    pub end_tick: Tick,
    pub smoothing_window: u64,
}

/// Unbounded iterator of virtual periods following the table.
///
/// Applies the same rules as materialization: decayed rate, pool = rate ×
/// length, rollover of the predecessor's pool when the predecessor's
/// trailing window saw no contributions. Virtual periods themselves hold no
/// contributions (any contribution materializes its period first).
pub struct Projection<'a> {
    table: &'a PeriodTable,
    history: &'a ParamsHistory,
    prev_index: PeriodIndex,
    prev_rate: Amount,
    prev_end: Tick,
    prev_pool: Amount,
    prev_window: u64,
    failed: bool,
}

impl Iterator for Projection<'_> {
    type Item = Result<ProjectedPeriod, MathError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let start = self.prev_end + 1;
        let params = self.history.at(start);

        let step = (|| {
            let rate = schedule::next_rate(
                self.prev_rate,
                params.decay_numerator,
                params.decay_denominator,
            )?;
            let mut pool = schedule::period_pool(rate, params.period_length)?;
            let window_start = smoothing::window_start(self.prev_index, self.prev_window);
            if !self.table.any_contributions_in(window_start, self.prev_index) {
                pool = math::add(pool, self.prev_pool)?;
            }
            Ok(ProjectedPeriod {
                index: self.prev_index + 1,
                reward_per_tick: rate,
                reward_amount: pool,
                start_tick: start,
                end_tick: start + params.period_length - 1,
                smoothing_window: params.smoothing_window_size,
            })
        })();

        match step {
            Ok(next) => {
                self.prev_index = next.index;
                self.prev_rate = next.reward_per_tick;
                self.prev_end = next.end_tick;
                self.prev_pool = next.reward_amount;
                self.prev_window = next.smoothing_window;
                Some(Ok(next))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
