//! Versioned snapshots and in-place schema migration.
//!
//! A snapshot is `(schema version, genesis, account wiring, event log)` —
//! nothing else, because the whole ledger state is a fold over the log.
//! Swapping the behavior module therefore never rewrites stored records:
//! an old-schema snapshot is mapped event-for-event into the current
//! schema, with the parameters the old schema did not know
//! (`smoothing_window_size`, `claim_delay_periods`) defaulted to 0. Window
//! 0 and delay 0 reproduce the pre-upgrade behavior exactly for every
//! already-elapsed period; the new machinery engages only if a governor
//! raises the parameters after the upgrade.

use serde::{Deserialize, Serialize};

use tithe_core::error::{SnapshotError, TitheError};
use tithe_core::params::{GenesisConfig, LedgerParameters};
use tithe_core::types::{AccountId, Amount, PeriodIndex, Tick};

use crate::ledger::Ledger;
use crate::replay::{rebuild, LedgerEvent};

/// Current snapshot schema version.
pub const SCHEMA_VERSION: u16 = 2;

/// A portable, versioned capture of a ledger's full history.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct LedgerSnapshot {
    pub version: u16,
    pub genesis: GenesisConfig,
    pub treasury: AccountId,
    pub governor: AccountId,
    pub events: Vec<LedgerEvent>,
}

impl LedgerSnapshot {
    /// Capture the complete history of a live ledger.
    pub fn capture(ledger: &Ledger) -> Self {
        Self {
            version: SCHEMA_VERSION,
            genesis: *ledger.genesis(),
            treasury: *ledger.treasury(),
            governor: *ledger.governor(),
            events: ledger.events().to_vec(),
        }
    }

    /// Rebuild a ledger from this snapshot.
    ///
    /// Fails with [`SnapshotError::UnsupportedVersion`] for foreign
    /// versions; old known schemas are upgraded via [`upgrade_v1`] before
    /// restoring.
    pub fn restore(&self) -> Result<Ledger, TitheError> {
        if self.version != SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version).into());
        }
        rebuild(self.genesis, self.treasury, self.governor, &self.events)
    }

    /// Encode to bytes (bincode, standard config).
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| SnapshotError::Codec(e.to_string()))
    }

    /// Decode from bytes produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::decode_from_slice(bytes, bincode::config::standard())
            .map(|(snapshot, _)| snapshot)
            .map_err(|e| SnapshotError::Codec(e.to_string()))
    }
}

// ----------------------------------------------------------------------
// Schema v1: the pre-smoothing, pre-delay ledger
// ----------------------------------------------------------------------

/// v1 parameters: no claim delay, no smoothing window.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct V1Parameters {
    pub period_length: u64,
    pub decay_numerator: u128,
    pub decay_denominator: u128,
}

impl From<V1Parameters> for LedgerParameters {
    fn from(v1: V1Parameters) -> Self {
        Self {
            period_length: v1.period_length,
            decay_numerator: v1.decay_numerator,
            decay_denominator: v1.decay_denominator,
            // Pre-upgrade behavior: immediate claims, no smoothing.
            claim_delay_periods: 0,
            smoothing_window_size: 0,
        }
    }
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct V1GenesisConfig {
    pub genesis_tick: Tick,
    pub initial_reward_per_tick: Amount,
    pub params: V1Parameters,
}

#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub enum V1Event {
    Contribution {
        payer: AccountId,
        donor: AccountId,
        amount: Amount,
        tick: Tick,
    },
    ParamChange {
        params: V1Parameters,
        tick: Tick,
    },
    Claim {
        donor: AccountId,
        up_to: PeriodIndex,
        amount: Amount,
        tick: Tick,
    },
}

/// A snapshot written by the v1 ledger.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct V1Snapshot {
    pub genesis: V1GenesisConfig,
    pub treasury: AccountId,
    pub governor: AccountId,
    pub events: Vec<V1Event>,
}

/// Upgrade a v1 snapshot to the current schema.
///
/// History is carried over unchanged; the new parameters default to values
/// that reproduce v1 behavior for everything already recorded.
pub fn upgrade_v1(v1: V1Snapshot) -> LedgerSnapshot {
    let events = v1
        .events
        .into_iter()
        .map(|event| match event {
            V1Event::Contribution {
                payer,
                donor,
                amount,
                tick,
            } => LedgerEvent::Contribution {
                payer,
                donor,
                amount,
                tick,
            },
            V1Event::ParamChange { params, tick } => LedgerEvent::ParamChange {
                params: params.into(),
                tick,
            },
            V1Event::Claim {
                donor,
                up_to,
                amount,
                tick,
            } => LedgerEvent::Claim {
                donor,
                up_to,
                amount,
                tick,
            },
        })
        .collect();
    LedgerSnapshot {
        version: SCHEMA_VERSION,
        genesis: GenesisConfig {
            genesis_tick: v1.genesis.genesis_tick,
            initial_reward_per_tick: v1.genesis.initial_reward_per_tick,
            params: v1.genesis.params.into(),
        },
        treasury: v1.treasury,
        governor: v1.governor,
        events,
    }
}
