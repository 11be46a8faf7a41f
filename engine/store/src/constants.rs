//! Engine Constants
//!
//! Protocol parameters (ratios, fees, limits) arrive as ledger data and are
//! never hardcoded here. The only fixed quantities are the engine's own.

/// Debt handling
pub mod debt {
    /// Floor substituted for a zero debt when forming a collateralization
    /// ratio, so the division is defined. A ratio computed against this
    /// floor is nominal: consumers must treat it as "no debt", not as a
    /// finite risk figure.
    pub const ZERO_DEBT_FLOOR: u64 = 1;
}
