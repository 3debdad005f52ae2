//! Decay schedule: per-period reward rates and pools.
//!
//! Period 1's rate is configured at genesis; every later period's rate is
//! `floor(previous × decay_numerator / decay_denominator)`. Truncation is
//! load-bearing: the realized total emission stays strictly below the
//! geometric-series bound.

use tithe_core::error::MathError;
use tithe_core::math;
use tithe_core::types::Amount;

/// Rate of the period following one with rate `prev_rate`.
pub fn next_rate(
    prev_rate: Amount,
    decay_numerator: u128,
    decay_denominator: u128,
) -> Result<Amount, MathError> {
    math::mul_div(prev_rate, decay_numerator, decay_denominator)
}

/// Raw reward pool of a period: rate × length. Computed once at
/// materialization and frozen.
pub fn period_pool(rate: Amount, period_length: u64) -> Result<Amount, MathError> {
    math::mul(rate, period_length as u128)
}
