//! Shared test helpers: the known-good reward table, amount parsing, and
//! ledger fixtures.
//!
//! Scenario constants: genesis tick 130, period length 20, initial rate
//! 216,000 tokens per tick, decay 998902/1000000. [`period_reward`]
//! carries the resulting per-period pools (exact to the base unit) for
//! periods 1–13.

use std::sync::Arc;

use tithe_core::constants::COIN;
use tithe_core::params::{GenesisConfig, LedgerParameters};
use tithe_core::types::{AccountId, Amount, PeriodIndex, Tick};
use tithe_core::vault::MemoryVault;
use tithe_ledger::Ledger;

pub const GENESIS_TICK: Tick = 130;
pub const PERIOD_LENGTH: u64 = 20;
pub const INITIAL_RATE: Amount = 216_000 * COIN;

/// Per-period reward pools (no rollover), as 18-decimal strings.
const PERIOD_REWARDS: &[&str] = &[
    "4320000",
    "4315256.64",
    "4310518.48820928",
    "4305785.53890922621056",
    "4301057.7863875038801808",
    "4296335.22493805040092036",
    "4291617.84886106842158014",
    "4286905.65246301896845324",
    "4282198.63005661457362586",
    "4277496.775960812410824",
    "4272800.0845008074387969",
    "4268108.5500080255522291",
    "4263422.16682011674017274",
];

/// Parse an 18-decimal token amount, e.g. `coins("4315256.64")`.
pub fn coins(s: &str) -> Amount {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    assert!(frac_part.len() <= 18, "more than 18 decimal places: {s}");
    let mut value = int_part.parse::<u128>().expect("integer part") * COIN;
    if !frac_part.is_empty() {
        let scale = 10u128.pow(18 - frac_part.len() as u32);
        value += frac_part.parse::<u128>().expect("fractional part") * scale;
    }
    value
}

/// Reward pool of period `n` (1-based) under the scenario schedule,
/// excluding rollover.
pub fn period_reward(n: PeriodIndex) -> Amount {
    coins(PERIOD_REWARDS[n as usize - 1])
}

/// Sum of [`period_reward`] over the inclusive range.
pub fn rewards_sum(from: PeriodIndex, to: PeriodIndex) -> Amount {
    (from..=to).map(period_reward).sum()
}

/// First tick of period `n` (1-based).
pub fn period_start(n: PeriodIndex) -> Tick {
    GENESIS_TICK + (n - 1) * PERIOD_LENGTH
}

/// Deterministic test account.
pub fn acct(seed: u8) -> AccountId {
    AccountId([seed; 32])
}

pub fn treasury() -> AccountId {
    acct(0xEE)
}

pub fn governor() -> AccountId {
    acct(0xDD)
}

/// Scenario genesis with the given smoothing window and claim delay.
pub fn scenario_genesis(smoothing_window_size: u64, claim_delay_periods: u64) -> GenesisConfig {
    GenesisConfig {
        genesis_tick: GENESIS_TICK,
        initial_reward_per_tick: INITIAL_RATE,
        params: LedgerParameters {
            period_length: PERIOD_LENGTH,
            smoothing_window_size,
            claim_delay_periods,
            ..LedgerParameters::default()
        },
    }
}

/// A ledger plus funded vault: accounts 1–9 each hold 100M stable tokens.
pub fn setup(smoothing_window_size: u64, claim_delay_periods: u64) -> (Ledger, Arc<MemoryVault>) {
    let vault = Arc::new(MemoryVault::new());
    for seed in 1..=9 {
        vault.mint_stable(&acct(seed), 100_000_000 * COIN);
    }
    let ledger = Ledger::new(
        scenario_genesis(smoothing_window_size, claim_delay_periods),
        treasury(),
        governor(),
        vault.clone(),
    )
    .expect("valid scenario genesis");
    (ledger, vault)
}

/// Opt-in test logging: `RUST_LOG=debug cargo test -- --nocapture`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coins_parses_integers() {
        assert_eq!(coins("1"), COIN);
        assert_eq!(coins("4320000"), 4_320_000 * COIN);
    }

    #[test]
    fn coins_parses_fractions() {
        assert_eq!(coins("0.5"), COIN / 2);
        assert_eq!(coins("4315256.64"), 4_315_256_640_000_000_000_000_000);
        assert_eq!(
            coins("4301057.7863875038801808"),
            4_301_057_786_387_503_880_180_800
        );
    }

    #[test]
    fn reward_table_is_decreasing() {
        for n in 2..=13 {
            assert!(period_reward(n) < period_reward(n - 1), "period {n}");
        }
    }

    #[test]
    fn rewards_sum_matches_manual() {
        assert_eq!(rewards_sum(1, 2), coins("8635256.64"));
        assert_eq!(rewards_sum(3, 3), period_reward(3));
    }

    #[test]
    fn period_start_arithmetic() {
        assert_eq!(period_start(1), 130);
        assert_eq!(period_start(2), 150);
        assert_eq!(period_start(8), 270);
    }
}
