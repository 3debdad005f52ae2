//! # tithe-ledger — Donation-mining reward ledger.
//!
//! All accounting uses integer arithmetic only for determinism.
//!
//! This crate implements the reward ledger of the Tithe protocol:
//! - **Period clock + decay schedule**: ticks bucket into fixed-length
//!   reward periods whose per-tick rate decays geometrically, with floor
//!   arithmetic so total emission converges below its series bound.
//! - **Contribution table**: an append-only donation log with per-period,
//!   per-donor totals.
//! - **Smoothing window**: each period's pool is distributed pro rata over
//!   contributions in a trailing window, blunting period-boundary timing
//!   games; pools with an empty window roll forward.
//! - **Claim engine**: delayed, exactly-once claims with partial
//!   (period-bounded) variants and audit views.
//! - **Replay + migration**: the ledger is a fold over its append-only
//!   event log; snapshots are versioned and older schemas upgrade without
//!   rewriting history.

pub mod claims;
pub mod contributions;
pub mod ledger;
pub mod migrate;
pub mod periods;
pub mod replay;
pub mod schedule;
pub mod shared;
pub mod smoothing;

pub use ledger::Ledger;
pub use migrate::{LedgerSnapshot, SCHEMA_VERSION};
pub use replay::{rebuild, LedgerEvent};
pub use shared::SharedLedger;
