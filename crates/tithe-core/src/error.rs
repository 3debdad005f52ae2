//! Error types for the Tithe protocol.
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("arithmetic overflow")] Overflow,
    #[error("division by zero")] DivisionByZero,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: u128, need: u128 },
    #[error("transfer rejected: {0}")] TransferRejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContributionError {
    #[error("contribution amount must be positive")] ZeroAmount,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("nothing to claim")] NothingToClaim,
    #[error("invalid period bound {requested}: must be within [{lower}, {upper}]")] InvalidPeriodBound { requested: u64, lower: u64, upper: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("caller is not the governor")] NotGovernor,
    #[error("period length must be positive")] ZeroPeriodLength,
    #[error("decay denominator must be positive")] ZeroDecayDenominator,
    #[error("decay must be contractive: {numerator}/{denominator} >= 1")] DecayNotContractive { numerator: u128, denominator: u128 },
    #[error("initial reward rate must be positive")] ZeroInitialRate,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("claim mismatch for donor {donor}: logged {logged}, recomputed {computed}")] ClaimMismatch { donor: String, logged: u128, computed: u128 },
    #[error("event at tick {event_tick} precedes earlier event at tick {prev_tick}")] NonMonotonicTick { event_tick: u64, prev_tick: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("unsupported snapshot version: {0}")] UnsupportedVersion(u16),
    #[error("snapshot codec: {0}")] Codec(String),
}

#[derive(Error, Debug)]
pub enum TitheError {
    #[error(transparent)] Math(#[from] MathError),
    #[error(transparent)] Token(#[from] TokenError),
    #[error(transparent)] Contribution(#[from] ContributionError),
    #[error(transparent)] Claim(#[from] ClaimError),
    #[error(transparent)] Governance(#[from] GovernanceError),
    #[error(transparent)] Replay(#[from] ReplayError),
    #[error(transparent)] Snapshot(#[from] SnapshotError),
}
