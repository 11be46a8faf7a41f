//! Interest Accrual Scaling
//!
//! A vault's debt is stored as a snapshot: the amount at the time of the
//! last write, plus the manager-wide compounded interest coefficient that
//! was current at that moment. The debt *now* is the snapshot scaled by how
//! far the manager's coefficient has moved since:
//!
//! `current = snapshot_debt * (compounded / interest_snapshot)`
//!
//! rounded up, so accrual never under-charges the borrower.

use crate::amount::Amount;
use crate::errors::MathResult;
use crate::ratio::{ceil_multiply, invert_ratio, multiply_ratios, ratio_equal, Ratio};

/// Scales a snapshotted debt up to the present compounded-interest
/// coefficient.
///
/// When the two coefficients are equal the snapshot is returned unchanged;
/// no rounding is introduced for a vault written in the current period.
pub fn calculate_current_debt(
    debt_snapshot: &Amount,
    interest_snapshot: &Ratio,
    compounded_interest: &Ratio,
) -> MathResult<Amount> {
    if ratio_equal(interest_snapshot, compounded_interest)? {
        return Ok(debt_snapshot.clone());
    }

    let accrued_since = multiply_ratios(compounded_interest, &invert_ratio(interest_snapshot)?)?;
    ceil_multiply(debt_snapshot, &accrued_since)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Brand;

    const SCALE: u64 = 1_000_000_000_000;

    fn ist(value: u64) -> Amount {
        Amount::new(Brand::new("IST"), value)
    }

    fn coefficient(scaled: u64) -> Ratio {
        Ratio::from_amounts(ist(scaled), ist(SCALE)).unwrap()
    }

    #[test]
    fn test_equal_coefficients_return_snapshot_unchanged() {
        let snapshot = coefficient(1_020_000_000_000);
        let debt = ist(123_456_789);
        assert_eq!(
            calculate_current_debt(&debt, &snapshot, &snapshot.clone()).unwrap(),
            debt
        );
    }

    #[test]
    fn test_five_percent_accrual() {
        // Snapshot at 1.00, manager now at 1.05: debt grows by exactly 5%
        let debt = calculate_current_debt(
            &ist(1_000),
            &coefficient(SCALE),
            &coefficient(1_050_000_000_000),
        )
        .unwrap();
        assert_eq!(debt, ist(1_050));
    }

    #[test]
    fn test_inexact_accrual_rounds_up() {
        // 100 * 1.05/1.02 = 102.94.. rounds to 103
        let debt = calculate_current_debt(
            &ist(100),
            &coefficient(1_020_000_000_000),
            &coefficient(1_050_000_000_000),
        )
        .unwrap();
        assert_eq!(debt, ist(103));
    }

    #[test]
    fn test_zero_debt_stays_zero() {
        let debt = calculate_current_debt(
            &ist(0),
            &coefficient(SCALE),
            &coefficient(1_999_000_000_000),
        )
        .unwrap();
        assert!(debt.is_zero());
    }

    #[test]
    fn test_equivalent_coefficients_at_different_scales() {
        // 1.05 expressed over two different scale factors is the same rate
        let small = Ratio::from_amounts(ist(105), ist(100)).unwrap();
        let debt = calculate_current_debt(&ist(200), &coefficient(SCALE), &small).unwrap();
        assert_eq!(debt, ist(210));
    }
}
