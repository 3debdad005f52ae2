//! Ledger parameters, genesis configuration, and the parameter history.
//!
//! Parameters are governor-mutable, but a change never rewrites history:
//! every accepted change is appended to a [`ParamsHistory`] keyed by its
//! effective tick, and a reward period starting at tick `s` always uses the
//! parameters in force at `s`. That rule makes the materialized period table
//! a pure function of `(genesis, parameter-change log)` no matter when
//! periods are lazily created, which is what keeps replay exact.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DECAY_DENOMINATOR, DECAY_NUMERATOR, DEFAULT_CLAIM_DELAY_PERIODS, DEFAULT_PERIOD_LENGTH,
    DEFAULT_SMOOTHING_WINDOW, INITIAL_REWARD_PER_TICK,
};
use crate::error::GovernanceError;
use crate::types::{Amount, Tick};

/// Governor-tunable ledger parameters.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct LedgerParameters {
    /// Reward period length in ticks.
    pub period_length: u64,
    /// Decay factor numerator applied per period.
    pub decay_numerator: u128,
    /// Decay factor denominator.
    pub decay_denominator: u128,
    /// Completed periods that must age before their rewards are claimable.
    pub claim_delay_periods: u64,
    /// Trailing periods a contribution keeps competing against.
    pub smoothing_window_size: u64,
}

impl Default for LedgerParameters {
    fn default() -> Self {
        Self {
            period_length: DEFAULT_PERIOD_LENGTH,
            decay_numerator: DECAY_NUMERATOR,
            decay_denominator: DECAY_DENOMINATOR,
            claim_delay_periods: DEFAULT_CLAIM_DELAY_PERIODS,
            smoothing_window_size: DEFAULT_SMOOTHING_WINDOW,
        }
    }
}

impl LedgerParameters {
    /// Validate parameter invariants.
    ///
    /// The decay factor must be strictly contractive so that total emission
    /// converges to its geometric-series bound.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.period_length == 0 {
            return Err(GovernanceError::ZeroPeriodLength);
        }
        if self.decay_denominator == 0 {
            return Err(GovernanceError::ZeroDecayDenominator);
        }
        if self.decay_numerator >= self.decay_denominator {
            return Err(GovernanceError::DecayNotContractive {
                numerator: self.decay_numerator,
                denominator: self.decay_denominator,
            });
        }
        Ok(())
    }
}

/// Immutable genesis configuration of a ledger instance.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct GenesisConfig {
    /// First tick of period 1. Ticks below this are outside the ledger's
    /// domain.
    pub genesis_tick: Tick,
    /// Reward rate of period 1, per tick. Not derived; configured.
    pub initial_reward_per_tick: Amount,
    /// Parameters in force from genesis until the first governance change.
    pub params: LedgerParameters,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            genesis_tick: 0,
            initial_reward_per_tick: INITIAL_REWARD_PER_TICK,
            params: LedgerParameters::default(),
        }
    }
}

impl GenesisConfig {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.initial_reward_per_tick == 0 {
            return Err(GovernanceError::ZeroInitialRate);
        }
        self.params.validate()
    }
}

/// Append-only log of parameter changes, keyed by effective tick.
///
/// `at(tick)` answers "which parameters were in force at `tick`": the last
/// recorded entry whose effective tick is ≤ `tick`. The genesis entry is
/// always present, so lookups at or after the genesis tick are total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamsHistory {
    entries: Vec<(Tick, LedgerParameters)>,
}

impl ParamsHistory {
    /// Start a history with the genesis parameters effective at
    /// `genesis_tick`.
    pub fn new(genesis_tick: Tick, params: LedgerParameters) -> Self {
        Self {
            entries: vec![(genesis_tick, params)],
        }
    }

    /// Record a parameter change effective at `tick`.
    ///
    /// Ticks must be non-decreasing; a second change at the same tick
    /// supersedes the first.
    pub fn record(&mut self, tick: Tick, params: LedgerParameters) {
        let last = self.entries.last().expect("history has a genesis entry");
        assert!(
            tick >= last.0,
            "parameter change at tick {tick} precedes last change at {}",
            last.0
        );
        self.entries.push((tick, params));
    }

    /// Parameters in force at `tick`. `tick` must not precede genesis.
    pub fn at(&self, tick: Tick) -> &LedgerParameters {
        let genesis = self.entries[0].0;
        assert!(tick >= genesis, "tick {tick} precedes genesis tick {genesis}");
        let entry = self
            .entries
            .iter()
            .rev()
            .find(|(t, _)| *t <= tick)
            .expect("genesis entry covers all ticks >= genesis");
        &entry.1
    }

    /// Parameters currently in force (the latest entry).
    pub fn current(&self) -> &LedgerParameters {
        &self.entries.last().expect("history has a genesis entry").1
    }

    /// All recorded entries, oldest first.
    pub fn entries(&self) -> &[(Tick, LedgerParameters)] {
        &self.entries
    }
}
