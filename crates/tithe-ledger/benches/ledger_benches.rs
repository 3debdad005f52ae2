//! Criterion benchmarks for ledger hot paths.
//!
//! Covers: period materialization, donation recording, and the smoothed
//! claimable computation over a long unclaimed range.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tithe_core::constants::COIN;
use tithe_core::params::{GenesisConfig, LedgerParameters};
use tithe_core::types::AccountId;
use tithe_core::vault::MemoryVault;
use tithe_ledger::Ledger;

fn acct(seed: u8) -> AccountId {
    AccountId([seed; 32])
}

fn genesis(window: u64) -> GenesisConfig {
    GenesisConfig {
        genesis_tick: 0,
        initial_reward_per_tick: 216_000 * COIN,
        params: LedgerParameters {
            period_length: 20,
            smoothing_window_size: window,
            ..LedgerParameters::default()
        },
    }
}

fn funded_ledger(window: u64) -> Ledger {
    let vault = Arc::new(MemoryVault::new());
    vault.mint_stable(&acct(1), u128::MAX / 2);
    Ledger::new(genesis(window), acct(0xEE), acct(0xDD), vault).unwrap()
}

fn bench_materialization(c: &mut Criterion) {
    c.bench_function("materialize_1000_periods", |b| {
        b.iter(|| {
            let mut ledger = funded_ledger(0);
            ledger
                .ensure_period_materialized(black_box(1000 * 20 - 1))
                .unwrap()
        })
    });
}

fn bench_donate(c: &mut Criterion) {
    c.bench_function("donate", |b| {
        let mut ledger = funded_ledger(0);
        let mut tick = 1;
        b.iter(|| {
            tick += 1;
            ledger.donate(acct(1), black_box(COIN), tick).unwrap()
        })
    });
}

fn bench_claimable_with_window(c: &mut Criterion) {
    // One donation per period for 200 periods, window 8, nothing claimed:
    // the worst realistic read.
    let mut ledger = funded_ledger(8);
    for i in 0..200u64 {
        ledger.donate(acct(1), 100 * COIN, i * 20 + 1).unwrap();
    }
    let now = 200 * 20 + 1;

    c.bench_function("calculate_claimable_200_periods", |b| {
        b.iter(|| {
            ledger
                .calculate_claimable(black_box(&acct(1)), black_box(now))
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_materialization,
    bench_donate,
    bench_claimable_with_window
);
criterion_main!(benches);
