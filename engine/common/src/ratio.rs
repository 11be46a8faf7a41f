//! Exact Rational Rates Between Branded Amounts
//!
//! A [`Ratio`] is a pair of amounts: a price (collateral → debt value), a
//! fee, or a dimensionless percentage when both sides carry the same brand.
//! All applications of a ratio to an amount round **up**: protocol-facing
//! conversions must never under-value collateral or under-charge debt, so
//! the rounding bias always sits on the protocol's side of the trade.
//!
//! Comparisons cross-multiply in `u128`: two `u64` factors cannot wrap a
//! `u128`, so no precision is ever lost to intermediate rounding.

use crate::amount::{Amount, Brand};
use crate::errors::{MathError, MathResult};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// The conventional denominator for dimensionless percentages (150% = 150/100)
pub const PERCENT_BASIS: u64 = 100;

/// An exact rational rate between two branded amounts.
///
/// Invariant: `denominator.value > 0`, enforced at construction.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Ratio {
    /// Output side of the rate
    pub numerator: Amount,
    /// Input side of the rate; value is strictly positive
    pub denominator: Amount,
}

impl Ratio {
    /// Builds a ratio from two amounts. Fails with `ZeroDenominator` if the
    /// denominator's value is zero.
    pub fn from_amounts(numerator: Amount, denominator: Amount) -> MathResult<Ratio> {
        if denominator.value == 0 {
            return Err(MathError::ZeroDenominator {
                brand: denominator.brand,
            });
        }
        Ok(Ratio {
            numerator,
            denominator,
        })
    }

    /// Dimensionless percentage of `brand`: `percent(150, b)` is 150%.
    pub fn percent(value: u64, brand: Brand) -> Ratio {
        Ratio {
            numerator: Amount::new(brand.clone(), value),
            denominator: Amount::new(brand, PERCENT_BASIS),
        }
    }

    /// True when the numerator's value is zero
    pub fn numerator_is_zero(&self) -> bool {
        self.numerator.value == 0
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// `ceil(value * numerator / denominator)` carried in `u128`
fn ceil_mul_div(value: u64, numerator: u64, denominator: u64) -> MathResult<u64> {
    debug_assert!(denominator > 0);
    let product = (value as u128) * (numerator as u128);
    let quotient = (product + (denominator as u128) - 1) / (denominator as u128);
    u64::try_from(quotient).map_err(|_| MathError::Overflow)
}

/// Applies a rate to an amount, rounding up.
///
/// The amount must carry the ratio's denominator brand; the result carries
/// the numerator brand. For a price quoted as `amountOut / amountIn`, this
/// converts collateral into its market value.
pub fn ceil_multiply(amount: &Amount, ratio: &Ratio) -> MathResult<Amount> {
    amount.same_brand(&ratio.denominator)?;
    let value = ceil_mul_div(amount.value, ratio.numerator.value, ratio.denominator.value)?;
    Ok(Amount::new(ratio.numerator.brand.clone(), value))
}

/// Applies a rate in reverse, rounding up.
///
/// The amount must carry the ratio's numerator brand; the result carries the
/// denominator brand. Fails with `ZeroNumerator` when the rate cannot be
/// inverted.
pub fn ceil_divide(amount: &Amount, ratio: &Ratio) -> MathResult<Amount> {
    amount.same_brand(&ratio.numerator)?;
    if ratio.numerator.value == 0 {
        return Err(MathError::ZeroNumerator {
            brand: ratio.numerator.brand.clone(),
        });
    }
    let value = ceil_mul_div(amount.value, ratio.denominator.value, ratio.numerator.value)?;
    Ok(Amount::new(ratio.denominator.brand.clone(), value))
}

fn same_brand_pair(left: &Ratio, right: &Ratio) -> MathResult<()> {
    left.numerator.same_brand(&right.numerator)?;
    left.denominator.same_brand(&right.denominator)
}

/// Exact `left >= right` over ratios of the same brand pair
pub fn ratio_gte(left: &Ratio, right: &Ratio) -> MathResult<bool> {
    same_brand_pair(left, right)?;
    let lhs = (left.numerator.value as u128) * (right.denominator.value as u128);
    let rhs = (right.numerator.value as u128) * (left.denominator.value as u128);
    Ok(lhs >= rhs)
}

/// Exact equality over ratios of the same brand pair
pub fn ratio_equal(left: &Ratio, right: &Ratio) -> MathResult<bool> {
    same_brand_pair(left, right)?;
    let lhs = (left.numerator.value as u128) * (right.denominator.value as u128);
    let rhs = (right.numerator.value as u128) * (left.denominator.value as u128);
    Ok(lhs == rhs)
}

/// Swaps a ratio's sides. Fails when the numerator is zero, since it would
/// become a zero denominator.
pub fn invert_ratio(ratio: &Ratio) -> MathResult<Ratio> {
    Ratio::from_amounts(ratio.denominator.clone(), ratio.numerator.clone())
}

/// Exact ratio composition: `(left.num / left.den) * (right.num / right.den)`.
///
/// Requires the inner brands to cancel (`left.denominator` against
/// `right.numerator`); the result is `left.numerator / right.denominator`.
/// Terms are cross-reduced by GCD before multiplying, so coefficient-scale
/// products (e.g. two 10^18-scaled interest coefficients) stay inside `u64`
/// storage whenever the reduced fraction does.
pub fn multiply_ratios(left: &Ratio, right: &Ratio) -> MathResult<Ratio> {
    left.denominator.same_brand(&right.numerator)?;

    // Denominators are strictly positive, so neither gcd can be zero.
    let g1 = gcd(left.numerator.value, right.denominator.value);
    let g2 = gcd(right.numerator.value, left.denominator.value);

    let num = ((left.numerator.value / g1) as u128) * ((right.numerator.value / g2) as u128);
    let den = ((left.denominator.value / g2) as u128) * ((right.denominator.value / g1) as u128);

    let numerator = Amount::new(
        left.numerator.brand.clone(),
        u64::try_from(num).map_err(|_| MathError::Overflow)?,
    );
    let denominator = Amount::new(
        right.denominator.brand.clone(),
        u64::try_from(den).map_err(|_| MathError::Overflow)?,
    );
    Ratio::from_amounts(numerator, denominator)
}
