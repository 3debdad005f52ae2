//! Core ledger records: reward periods, contributions, donor state.
//!
//! All monetary values are u128 base units (1 token = 10^18 base units).
//! Ticks are an externally supplied monotone counter (block numbers in the
//! reference deployment); the ledger never reads a clock of its own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary amount in base units.
pub type Amount = u128;

/// Monotonically increasing time counter supplied by the caller.
pub type Tick = u64;

/// 1-based reward period index.
pub type PeriodIndex = u64;

/// 1-based contribution log id.
pub type ContributionId = u64;

/// A 32-byte account identifier.
///
/// Used for donors, the treasury, and the governor. The ledger treats it
/// as an opaque key; the embedding system decides how identities map onto it.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// The zero account. Never a valid donor.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create an AccountId from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A materialized reward period. Append-only; every field except
/// `contributions_amount` is frozen at materialization.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct RewardPeriod {
    /// 1-based period index.
    pub index: PeriodIndex,
    /// Raw reward rate per tick, decayed from the previous period.
    pub reward_per_tick: Amount,
    /// Reward pool for this period: `reward_per_tick × length`, plus any
    /// pool rolled over from a predecessor whose trailing window saw no
    /// contributions.
    pub reward_amount: Amount,
    /// First tick of the period (inclusive).
    pub start_tick: Tick,
    /// Last tick of the period (inclusive).
    pub end_tick: Tick,
    /// Total contributions recorded while the period was current.
    pub contributions_amount: Amount,
    /// Smoothing window size in force at `start_tick`, frozen here so
    /// later governance changes never rewrite this period's payout math.
    pub smoothing_window: u64,
}

impl RewardPeriod {
    /// Period length in ticks.
    pub fn length(&self) -> u64 {
        self.end_tick - self.start_tick + 1
    }

    /// Whether `tick` falls inside this period.
    pub fn contains(&self, tick: Tick) -> bool {
        self.start_tick <= tick && tick <= self.end_tick
    }
}

/// One row of the append-only contribution log.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Contribution {
    /// 1-based log id.
    pub id: ContributionId,
    /// Account credited with the contribution.
    pub donor: AccountId,
    /// Destination of the contributed value (the treasury).
    pub target: AccountId,
    /// Period the contribution was recorded in.
    pub period_index: PeriodIndex,
    /// Tick at which the contribution was recorded.
    pub tick: Tick,
    /// Contributed amount in base units.
    pub amount: Amount,
    /// Price of the contributed asset relative to the unit of account,
    /// fixed-point with [`crate::constants::UNIT_PRICE_ONE`] = 1.0.
    /// Always 1.0 in the single-asset deployment.
    pub unit_of_account_price: Amount,
}

/// Per-donor cursor. Created on first contribution, mutated on every
/// contribution and claim, never deleted.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct DonorState {
    /// Number of distinct periods this donor has contributed in.
    pub contribution_period_count: u64,
    /// Highest period index already paid out. 0 = never claimed.
    pub last_claimed_period: PeriodIndex,
    /// Tick of the last successful claim. 0 = never claimed.
    pub last_claim_tick: Tick,
}
