//! Error Types for Vaultsmith Arithmetic
//!
//! Every variant here is a *programming* error: the caller violated a
//! precondition (mixed asset brands, a zero denominator, an
//! internally-inconsistent subtraction). Expected user-facing conditions
//! such as insufficient funds or a ratio below the minimum are never
//! represented here; the store derives those as data.

use crate::amount::Brand;

/// Result type alias for brand-checked arithmetic
pub type MathResult<T> = Result<T, MathError>;

/// Main error enum for all arithmetic preconditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Operands carry different asset brands
    BrandMismatch { expected: Brand, actual: Brand },

    /// Subtraction would produce a negative amount
    NegativeResult { minuend: u64, subtrahend: u64 },

    /// Ratio constructed with a zero-value denominator
    ZeroDenominator { brand: Brand },

    /// Division through a ratio with a zero-value numerator
    ZeroNumerator { brand: Brand },

    /// Intermediate or final value exceeds the representable range
    Overflow,
}

impl MathError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::BrandMismatch { .. } => "E001_BRAND_MISMATCH",
            Self::NegativeResult { .. } => "E002_NEGATIVE_RESULT",
            Self::ZeroDenominator { .. } => "E003_ZERO_DENOMINATOR",
            Self::ZeroNumerator { .. } => "E004_ZERO_NUMERATOR",
            Self::Overflow => "E005_OVERFLOW",
        }
    }
}

impl core::fmt::Display for MathError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BrandMismatch { expected, actual } => {
                write!(f, "{}: expected {expected}, got {actual}", self.code())
            }
            Self::NegativeResult {
                minuend,
                subtrahend,
            } => {
                write!(f, "{}: {minuend} - {subtrahend}", self.code())
            }
            Self::ZeroDenominator { brand } => {
                write!(f, "{}: denominator brand {brand}", self.code())
            }
            Self::ZeroNumerator { brand } => {
                write!(f, "{}: numerator brand {brand}", self.code())
            }
            Self::Overflow => f.write_str(self.code()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MathError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_error_codes_unique() {
        let ist = Brand::new("IST");
        let atom = Brand::new("ATOM");
        let errors = [
            MathError::BrandMismatch {
                expected: ist.clone(),
                actual: atom.clone(),
            },
            MathError::NegativeResult {
                minuend: 1,
                subtrahend: 2,
            },
            MathError::ZeroDenominator { brand: ist },
            MathError::ZeroNumerator { brand: atom },
            MathError::Overflow,
        ];

        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let unique: BTreeSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "Error codes must be unique");
    }

    #[test]
    fn test_display_includes_code() {
        let err = MathError::NegativeResult {
            minuend: 5,
            subtrahend: 9,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("E002_NEGATIVE_RESULT"));
        assert!(rendered.contains("5 - 9"));
    }
}
