//! Vaultsmith Common Library
//!
//! Shared arithmetic substrate for the Vaultsmith position engine: branded
//! amounts, exact rational rates, interest-accrual scaling, and the typed
//! errors their preconditions fail with.
//!
//! Everything here is pure and total over valid inputs. The only failure
//! modes are caller precondition violations (mixed brands, zero
//! denominators, negative results), which are programming errors and
//! surface as [`MathError`], never as silent clamping.
//!
//! This crate is `no_std` compatible when built without the default `std`
//! feature enabled.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export String for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::string::String;
#[cfg(feature = "std")]
pub use std::string::String;

pub mod amount;
pub mod errors;
pub mod interest;
pub mod ratio;

// Re-exports for convenience
pub use amount::{Amount, Brand};
pub use errors::{MathError, MathResult};
pub use interest::calculate_current_debt;
pub use ratio::{
    ceil_divide, ceil_multiply, invert_ratio, multiply_ratios, ratio_equal, ratio_gte, Ratio,
    PERCENT_BASIS,
};
