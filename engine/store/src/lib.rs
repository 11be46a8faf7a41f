//! Vaultsmith Store
//!
//! The reactive financial-state engine behind vault position sizing: a
//! store of input and derived cells that turns ledger-sourced market data
//! and user edits into consistent derived facts (accrued debt, locked
//! value, collateralization ratios, projected post-adjustment state, the
//! creation solver's lock/receive/ratio triple) and a structured
//! validation-error set.
//!
//! The engine is single-threaded and synchronous: every write to an input
//! cell is followed by one deterministic recompute pass, so readers never
//! observe a partially-updated state. It performs no I/O and never fetches
//! data itself; ingestion and offer submission belong to the host.
//!
//! ## Example
//!
//! ```
//! use vaultsmith_common::{Amount, Brand, Ratio};
//! use vaultsmith_store::{FactoryParams, ManagerMetrics, ManagerParams, PriceQuote, VaultStore};
//!
//! let ist = Brand::new("IST");
//! let atom = Brand::new("ATOM");
//!
//! let mut store = VaultStore::new();
//! store.update_manager_metrics("manager0".into(), ManagerMetrics {
//!     total_debt: Amount::zero(ist.clone()),
//!     total_collateral: Amount::zero(atom.clone()),
//!     retained_collateral: Amount::zero(atom.clone()),
//! }).unwrap();
//! store.update_manager_params("manager0".into(), ManagerParams {
//!     liquidation_margin: Ratio::percent(150, ist.clone()),
//!     inferred_minimum_collateralization: Ratio::percent(150, ist.clone()),
//!     interest_rate: Ratio::percent(2, ist.clone()),
//!     loan_fee: Ratio::percent(1, ist.clone()),
//!     debt_limit: Amount::new(ist.clone(), 1_000_000),
//! }).unwrap();
//! store.update_price(PriceQuote {
//!     amount_in: Amount::new(atom, 1),
//!     amount_out: Amount::new(ist.clone(), 2),
//! }).unwrap();
//! store.update_factory_params(FactoryParams {
//!     min_initial_debt: Amount::new(ist, 50),
//! }).unwrap();
//!
//! store.select_collateral_kind(Some("manager0".into())).unwrap();
//! store.set_amount_to_lock(100).unwrap();
//! // lock 100 at price 2 against the 150% default ratio
//! assert_eq!(store.value_to_receive(), Some(134));
//! ```

pub mod adjust;
pub mod cell;
pub mod constants;
pub mod create;
pub mod ledger;
pub mod math;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod integration_tests;

// Re-exports for convenience
pub use adjust::{CollateralAction, DebtAction, VaultAfterAdjustment, VaultToAdjust};
pub use cell::{Derived, Input};
pub use create::CreateState;
pub use ledger::LedgerState;
pub use store::VaultStore;
pub use types::{
    DebtSnapshot, FactoryParams, Manager, ManagerId, ManagerMetrics, ManagerParams, OfferId,
    PriceQuote, VaultKey, VaultSnapshot, VaultState,
};
pub use validation::{
    AdjustVaultErrors, CollateralError, DebtError, LockError, RatioError, ReceiveError,
    VaultCreationErrors,
};
