//! Protocol constants. All monetary values are u128 in base units
//! (1 token = 10^18 base units), matching the 18-decimal assets the
//! protocol accounts for.

pub const COIN: u128 = 1_000_000_000_000_000_000;

/// Fixed-point representation of a 1.0 unit-of-account price.
///
/// Contributions record the price of the contributed asset relative to the
/// unit of account at contribution time. The single-asset deployment always
/// records 1.0.
pub const UNIT_PRICE_ONE: u128 = COIN;

/// Default reward period length in ticks (one day at a 5-second tick).
pub const DEFAULT_PERIOD_LENGTH: u64 = 17_280;

/// Reward rate of the first period, per tick. Subsequent periods decay
/// geometrically from this value.
pub const INITIAL_REWARD_PER_TICK: u128 = 216_000 * COIN;

/// Per-period decay factor numerator. Each period's rate is
/// `floor(previous * DECAY_NUMERATOR / DECAY_DENOMINATOR)`.
pub const DECAY_NUMERATOR: u128 = 998_902;
pub const DECAY_DENOMINATOR: u128 = 1_000_000;

/// Periods a completed period must age before its rewards are claimable.
pub const DEFAULT_CLAIM_DELAY_PERIODS: u64 = 0;

/// Trailing periods a contribution keeps competing against. 0 disables
/// smoothing: each period's pool is split over that period alone.
pub const DEFAULT_SMOOTHING_WINDOW: u64 = 0;

/// Upper bound on total emission under the default schedule: the geometric
/// series limit `first_pool / (1 - decay)`. Truncating decay arithmetic
/// keeps the realized total strictly below this.
pub const EMISSION_CEILING: u128 = INITIAL_REWARD_PER_TICK
    * DEFAULT_PERIOD_LENGTH as u128
    * DECAY_DENOMINATOR
    / (DECAY_DENOMINATOR - DECAY_NUMERATOR);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_is_18_decimals() {
        assert_eq!(COIN, 10u128.pow(18));
    }

    #[test]
    fn decay_is_contractive() {
        assert!(DECAY_NUMERATOR < DECAY_DENOMINATOR);
    }

    #[test]
    fn first_period_pool() {
        assert_eq!(
            INITIAL_REWARD_PER_TICK * DEFAULT_PERIOD_LENGTH as u128,
            3_732_480_000 * COIN
        );
    }

    #[test]
    fn emission_ceiling_exceeds_first_pool() {
        let first_pool = INITIAL_REWARD_PER_TICK * DEFAULT_PERIOD_LENGTH as u128;
        assert!(EMISSION_CEILING > first_pool);
        // 1/(1 - 0.998902) ≈ 910.7 periods' worth of the first pool.
        assert_eq!(EMISSION_CEILING / first_pool, 910);
    }
}
