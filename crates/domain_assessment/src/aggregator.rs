//! Claim cost aggregation

use core_kernel::{Currency, Money};
use crate::adjustment::Adjustment;
use crate::error::AssessmentError;

/// Sums the adjusted cost of every item
///
/// Not cached: callers recompute after each mutation. Order does not matter
/// and an empty set totals zero.
pub fn total<'a, I>(adjustments: I, currency: Currency) -> Result<Money, AssessmentError>
where
    I: IntoIterator<Item = &'a Adjustment>,
{
    let total = adjustments
        .into_iter()
        .try_fold(Money::zero(currency), |acc, adjustment| {
            acc.checked_add(&adjustment.cost)
        })?;
    Ok(total)
}
