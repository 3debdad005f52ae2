//! Integer math helpers for reward accounting.
//!
//! Amounts are u128 base units of 18-decimal tokens, so products like
//! `pool × donor_amount` routinely exceed 2^128. [`mul_div`] widens through
//! `U256` and truncates, the same way every division in the reward schedule
//! truncates: emission can only ever round down, never up.

use primitive_types::U256;

use crate::error::MathError;

/// `floor(a × b / denominator)` with a 256-bit intermediate.
///
/// # Errors
///
/// - [`MathError::DivisionByZero`] if `denominator` is zero
/// - [`MathError::Overflow`] if the quotient does not fit in u128
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let wide = U256::from(a) * U256::from(b) / U256::from(denominator);
    if wide.bits() > 128 {
        return Err(MathError::Overflow);
    }
    Ok(wide.as_u128())
}

/// Checked addition surfacing overflow as a [`MathError`].
pub fn add(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

/// Checked multiplication surfacing overflow as a [`MathError`].
pub fn mul(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // --- mul_div ---

    #[test]
    fn mul_div_exact() {
        assert_eq!(mul_div(6, 7, 3).unwrap(), 14);
    }

    #[test]
    fn mul_div_truncates() {
        assert_eq!(mul_div(7, 7, 10).unwrap(), 4);
        assert_eq!(mul_div(1, 1, 2).unwrap(), 0);
    }

    #[test]
    fn mul_div_wide_intermediate() {
        // a × b overflows u128 but the quotient fits.
        let a = u128::MAX / 2;
        let b = 1_000_000;
        assert_eq!(mul_div(a, b, b).unwrap(), a);
    }

    #[test]
    fn mul_div_division_by_zero() {
        assert_eq!(mul_div(1, 1, 0), Err(MathError::DivisionByZero));
    }

    #[test]
    fn mul_div_quotient_overflow() {
        assert_eq!(mul_div(u128::MAX, 2, 1), Err(MathError::Overflow));
    }

    #[test]
    fn mul_div_pro_rata_share() {
        // 18-decimal amounts: pool 8.6e24, donor 100e18 of 600e18 total.
        let pool = 8_635_256_640_000_000_000_000_000u128;
        let donor = 100_000_000_000_000_000_000u128;
        let total = 600_000_000_000_000_000_000u128;
        assert_eq!(mul_div(pool, donor, total).unwrap(), pool / 6);
    }

    // --- add / mul ---

    #[test]
    fn add_overflow() {
        assert_eq!(add(u128::MAX, 1), Err(MathError::Overflow));
        assert_eq!(add(1, 2).unwrap(), 3);
    }

    #[test]
    fn mul_overflow() {
        assert_eq!(mul(u128::MAX, 2), Err(MathError::Overflow));
        assert_eq!(mul(3, 4).unwrap(), 12);
    }

    // --- properties ---

    proptest! {
        #[test]
        fn mul_div_share_never_exceeds_pool(
            pool in 0u128..=u128::MAX / 2,
            part in 0u128..=1u128 << 100,
            total in 1u128..=1u128 << 100,
        ) {
            let part = part.min(total);
            let share = mul_div(pool, part, total).unwrap();
            prop_assert!(share <= pool);
        }

        #[test]
        fn mul_div_shares_conserve(
            pool in 0u128..=1u128 << 120,
            a in 1u128..=1u128 << 100,
            b in 1u128..=1u128 << 100,
        ) {
            let total = a + b;
            let sa = mul_div(pool, a, total).unwrap();
            let sb = mul_div(pool, b, total).unwrap();
            // Truncation loses at most one base unit per participant.
            prop_assert!(sa + sb <= pool);
            prop_assert!(pool - (sa + sb) <= 2);
        }
    }
}
