//! Event log and replay: the ledger as a fold over its own history.
//!
//! Every mutating operation appends a [`LedgerEvent`]. Rebuilding a ledger
//! from `(genesis, event log)` routes each event through the same code
//! paths the live instance used, with a [`NullVault`] standing in for the
//! token system (the funds already moved when the events were recorded).
//! Claim events double as an audit trail: replay recomputes each payout
//! and fails loudly if the log disagrees with the arithmetic.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tithe_core::error::{ReplayError, TitheError};
use tithe_core::params::{GenesisConfig, LedgerParameters};
use tithe_core::types::{AccountId, Amount, PeriodIndex, Tick};
use tithe_core::vault::NullVault;

use crate::ledger::Ledger;

/// One entry of the append-only operation log.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub enum LedgerEvent {
    /// A donation: `payer` funded it, `donor` is credited.
    Contribution {
        payer: AccountId,
        donor: AccountId,
        amount: Amount,
        tick: Tick,
    },
    /// A governance parameter change, effective at `tick`.
    ParamChange {
        params: LedgerParameters,
        tick: Tick,
    },
    /// A successful claim through period `up_to` paying `amount`.
    Claim {
        donor: AccountId,
        up_to: PeriodIndex,
        amount: Amount,
        tick: Tick,
    },
}

impl LedgerEvent {
    /// The tick the event was recorded at.
    pub fn tick(&self) -> Tick {
        match self {
            Self::Contribution { tick, .. }
            | Self::ParamChange { tick, .. }
            | Self::Claim { tick, .. } => *tick,
        }
    }
}

/// Rebuild a ledger from genesis and an event log.
///
/// The rebuilt instance is byte-for-byte equivalent to the live one:
/// identical period records, donor cursors, contribution log, and
/// claimable views.
///
/// # Errors
///
/// - [`ReplayError::NonMonotonicTick`] if the log is out of order
/// - [`ReplayError::ClaimMismatch`] if a logged claim amount disagrees
///   with the recomputed payout
pub fn rebuild(
    genesis: GenesisConfig,
    treasury: AccountId,
    governor: AccountId,
    events: &[LedgerEvent],
) -> Result<Ledger, TitheError> {
    let mut prev_tick = genesis.genesis_tick;
    for event in events {
        let tick = event.tick();
        if tick < prev_tick {
            return Err(ReplayError::NonMonotonicTick {
                event_tick: tick,
                prev_tick,
            }
            .into());
        }
        prev_tick = tick;
    }

    let mut ledger = Ledger::new(genesis, treasury, governor, Arc::new(NullVault))?;
    for event in events {
        match event {
            LedgerEvent::Contribution {
                payer,
                donor,
                amount,
                tick,
            } => {
                ledger.donate_on_behalf(*payer, *donor, *amount, *tick)?;
            }
            LedgerEvent::ParamChange { params, tick } => {
                ledger.apply_param_change(*params, *tick)?;
            }
            LedgerEvent::Claim {
                donor,
                up_to,
                amount,
                tick,
            } => {
                let paid = ledger.claim_rewards_up_to(*donor, *up_to, *tick)?;
                if paid != *amount {
                    return Err(ReplayError::ClaimMismatch {
                        donor: donor.to_string(),
                        logged: *amount,
                        computed: paid,
                    }
                    .into());
                }
            }
        }
    }
    Ok(ledger)
}
