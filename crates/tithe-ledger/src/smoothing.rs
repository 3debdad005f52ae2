//! Smoothing window: trailing-window pro-rata attribution.
//!
//! A period's pool is not paid out against that period's own contributions
//! alone. With window size `w`, period `p`'s pool is split pro rata over
//! all contributions recorded in periods `[p − w, p]`. A contribution in
//! period `q` therefore keeps earning slices of the `w` pools that follow
//! `q`: a donor who contributes just before a period boundary gains no
//! timing edge, and a single oversized late contribution dilutes any one
//! pool by at most its share of the whole window.
//!
//! Externally this reads as a claimable balance that grows period over
//! period with no new action from the donor, never shrinks once a period
//! exists, and stops growing once the window has moved past the
//! contribution.

use tithe_core::error::MathError;
use tithe_core::math;
use tithe_core::types::{AccountId, Amount, PeriodIndex};

use crate::contributions::ContributionTable;
use crate::periods::PeriodTable;

/// First period of the trailing window ending at `index`.
pub fn window_start(index: PeriodIndex, window: u64) -> PeriodIndex {
    index.saturating_sub(window).max(1)
}

/// `donor`'s share of a pool distributed over the trailing window ending at
/// `index`.
///
/// `window` and `pool` come from the period's frozen record (or its
/// projected equivalent). Returns 0 when the donor has nothing in the
/// window; the pool then either goes to other window participants or, if
/// the whole window is empty, rolls forward at materialization.
pub(crate) fn period_share(
    table: &PeriodTable,
    contributions: &ContributionTable,
    donor: &AccountId,
    index: PeriodIndex,
    window: u64,
    pool: Amount,
) -> Result<Amount, MathError> {
    let from = window_start(index, window);
    // Periods past the materialized table hold no contributions.
    let to = index.min(table.count());
    if to < from {
        return Ok(0);
    }
    let donor_amount = contributions.donor_amount_in_range(donor, from, to)?;
    if donor_amount == 0 {
        return Ok(0);
    }
    let total_amount = table.total_contributions_in(from, to)?;
    math::mul_div(pool, donor_amount, total_amount)
}
