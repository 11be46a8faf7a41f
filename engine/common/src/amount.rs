//! Branded Asset Amounts
//!
//! An [`Amount`] is a non-negative integer quantity of exactly one asset
//! kind, tagged by a [`Brand`]. Arithmetic is only defined between amounts
//! of the same brand; crossing brands is a caller bug and fails fast with
//! [`MathError::BrandMismatch`]. Values are discrete base units (e.g.
//! micro-IST), so every operation is exact. No floating point anywhere.

use crate::errors::{MathError, MathResult};
use crate::String;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Opaque identity for one asset kind.
///
/// Two brands are the same asset if and only if they compare equal. The
/// symbol is the ledger-level denomination string; the engine never parses
/// it, only compares and displays it.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Brand(String);

impl Brand {
    /// Creates a brand from its ledger symbol
    pub fn new(symbol: &str) -> Self {
        Self(String::from(symbol))
    }

    /// The ledger symbol for this brand
    pub fn symbol(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Brand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A discrete quantity of one branded asset. Immutable once constructed.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Amount {
    /// Asset kind this quantity is denominated in
    pub brand: Brand,
    /// Quantity in base units
    pub value: u64,
}

impl Amount {
    /// Creates an amount of `value` base units of `brand`
    pub fn new(brand: Brand, value: u64) -> Self {
        Self { brand, value }
    }

    /// The empty amount of `brand`
    pub fn zero(brand: Brand) -> Self {
        Self { brand, value: 0 }
    }

    /// Returns true if the value is zero
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Checks that `other` carries this amount's brand
    pub fn same_brand(&self, other: &Amount) -> MathResult<()> {
        if self.brand != other.brand {
            return Err(MathError::BrandMismatch {
                expected: self.brand.clone(),
                actual: other.brand.clone(),
            });
        }
        Ok(())
    }

    /// Brand-checked addition
    pub fn add(&self, other: &Amount) -> MathResult<Amount> {
        self.same_brand(other)?;
        let value = self
            .value
            .checked_add(other.value)
            .ok_or(MathError::Overflow)?;
        Ok(Amount::new(self.brand.clone(), value))
    }

    /// Brand-checked subtraction. Fails with `NegativeResult` if
    /// `other` exceeds `self`; amounts are never negative.
    pub fn subtract(&self, other: &Amount) -> MathResult<Amount> {
        self.same_brand(other)?;
        let value = self
            .value
            .checked_sub(other.value)
            .ok_or(MathError::NegativeResult {
                minuend: self.value,
                subtrahend: other.value,
            })?;
        Ok(Amount::new(self.brand.clone(), value))
    }

    /// Brand-checked `self >= other`
    pub fn is_gte(&self, other: &Amount) -> MathResult<bool> {
        self.same_brand(other)?;
        Ok(self.value >= other.value)
    }

    /// Brand-checked equality
    pub fn is_equal(&self, other: &Amount) -> MathResult<bool> {
        self.same_brand(other)?;
        Ok(self.value == other.value)
    }

    /// Brand-checked maximum
    pub fn max(&self, other: &Amount) -> MathResult<Amount> {
        self.same_brand(other)?;
        Ok(if self.value >= other.value {
            self.clone()
        } else {
            other.clone()
        })
    }

    /// Brand-checked minimum
    pub fn min(&self, other: &Amount) -> MathResult<Amount> {
        self.same_brand(other)?;
        Ok(if self.value <= other.value {
            self.clone()
        } else {
            other.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ist(value: u64) -> Amount {
        Amount::new(Brand::new("IST"), value)
    }

    fn atom(value: u64) -> Amount {
        Amount::new(Brand::new("ATOM"), value)
    }

    #[test]
    fn test_add_same_brand() {
        assert_eq!(ist(30).add(&ist(12)).unwrap(), ist(42));
    }

    #[test]
    fn test_add_brand_mismatch() {
        let err = ist(1).add(&atom(1)).unwrap_err();
        assert_eq!(err.code(), "E001_BRAND_MISMATCH");
    }

    #[test]
    fn test_add_overflow() {
        assert_eq!(ist(u64::MAX).add(&ist(1)).unwrap_err(), MathError::Overflow);
    }

    #[test]
    fn test_subtract() {
        assert_eq!(ist(50).subtract(&ist(20)).unwrap(), ist(30));
        assert_eq!(ist(50).subtract(&ist(50)).unwrap(), ist(0));
    }

    #[test]
    fn test_subtract_negative_result() {
        let err = ist(20).subtract(&ist(50)).unwrap_err();
        assert_eq!(
            err,
            MathError::NegativeResult {
                minuend: 20,
                subtrahend: 50,
            }
        );
    }

    #[test]
    fn test_comparisons() {
        assert!(ist(5).is_gte(&ist(5)).unwrap());
        assert!(ist(6).is_gte(&ist(5)).unwrap());
        assert!(!ist(4).is_gte(&ist(5)).unwrap());
        assert!(ist(5).is_equal(&ist(5)).unwrap());
        assert!(ist(5).is_gte(&atom(5)).is_err());
    }

    #[test]
    fn test_max_min() {
        assert_eq!(ist(3).max(&ist(7)).unwrap(), ist(7));
        assert_eq!(ist(3).min(&ist(7)).unwrap(), ist(3));
    }

    #[test]
    fn test_zero() {
        let z = Amount::zero(Brand::new("IST"));
        assert!(z.is_zero());
        assert_eq!(z.value, 0);
    }
}
