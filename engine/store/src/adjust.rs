//! Vault Adjustment Model
//!
//! Derives the current financial state of a selected vault (accrued debt,
//! locked collateral value, collateralization ratio) and projects the state
//! after a proposed delta: deposit or withdraw collateral, borrow or repay
//! debt. Nothing here mutates the ledger snapshot; projections are freshly
//! constructed values.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vaultsmith_common::{calculate_current_debt, ceil_multiply, Amount, MathResult, Ratio};

use crate::cell::Input;
use crate::constants::debt::ZERO_DEBT_FLOOR;
use crate::ledger::LedgerState;
use crate::math::{debt_after_delta, locked_after_delta};
use crate::types::{ManagerMetrics, ManagerParams, OfferId, PriceQuote, VaultKey, VaultState};

/// Collateral side of a proposed adjustment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub enum CollateralAction {
    /// Leave collateral unchanged
    #[default]
    None,
    /// Add collateral from the user's purse
    Deposit,
    /// Return collateral to the user's purse
    Withdraw,
}

/// Debt side of a proposed adjustment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub enum DebtAction {
    /// Leave debt unchanged
    #[default]
    None,
    /// Pay down debt from the user's purse
    Repay,
    /// Draw more debt against the vault
    Borrow,
}

/// User-editable input cells of the adjustment graph
#[derive(Debug, Default)]
pub struct AdjustState {
    vault_key: Input<VaultKey>,
    collateral_action: CollateralAction,
    debt_action: DebtAction,
    collateral_delta: Input<u64>,
    debt_delta: Input<u64>,
}

impl AdjustState {
    pub(crate) fn select_vault(&mut self, key: VaultKey) {
        debug!(manager = %key.manager_id, index = key.index_within_manager, "vault selected");
        self.vault_key.set(key);
    }

    pub(crate) fn clear_vault_selection(&mut self) {
        self.vault_key.clear();
    }

    /// Choosing an action discards the delta entered for that axis:
    /// a magnitude typed for "deposit" must not silently become a withdraw.
    pub(crate) fn set_collateral_action(&mut self, action: CollateralAction) {
        self.collateral_delta.clear();
        self.collateral_action = action;
    }

    pub(crate) fn set_debt_action(&mut self, action: DebtAction) {
        self.debt_delta.clear();
        self.debt_action = action;
    }

    pub(crate) fn set_collateral_delta(&mut self, value: u64) {
        self.collateral_delta.set(value);
    }

    pub(crate) fn set_debt_delta(&mut self, value: u64) {
        self.debt_delta.set(value);
    }

    pub fn vault_key(&self) -> Option<&VaultKey> {
        self.vault_key.get()
    }

    pub fn collateral_action(&self) -> CollateralAction {
        self.collateral_action
    }

    pub fn debt_action(&self) -> DebtAction {
        self.debt_action
    }

    pub fn collateral_delta(&self) -> Option<u64> {
        self.collateral_delta.get().copied()
    }

    pub fn debt_delta(&self) -> Option<u64> {
        self.debt_delta.get().copied()
    }
}

/// Current state of the selected vault, derived from ledger cells.
///
/// `collateralization_ratio` is formed against `max(total_debt, 1)`; when
/// `total_debt` is zero the number is nominal and consumers must render it
/// as "no debt", never as a finite risk figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultToAdjust {
    /// Market value of the locked collateral, rounded up
    pub total_locked_value: Amount,
    /// Debt including interest accrued since the vault's snapshot
    pub total_debt: Amount,
    /// Quote the valuation was taken at
    pub collateral_price: PriceQuote,
    /// Locked collateral
    pub locked: Amount,
    /// Position of the vault within its manager
    pub index_within_manager: u64,
    /// Governed parameters of the vault's manager
    pub params: ManagerParams,
    /// Live metrics of the vault's manager
    pub metrics: ManagerMetrics,
    /// Current collateralization (see type-level note on zero debt)
    pub collateralization_ratio: Ratio,
    /// Offer that created the vault
    pub created_by_offer_id: OfferId,
    /// Lifecycle state; only `Active` vaults accept adjustments
    pub vault_state: VaultState,
}

/// Projected state after the proposed adjustment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultAfterAdjustment {
    /// Debt after the delta, loan fee included when borrowing
    pub new_debt: Amount,
    /// Locked collateral after the delta
    pub new_locked: Amount,
    /// Collateralization after the delta, zero debt floored as before
    pub new_collateralization_ratio: Ratio,
}

fn floor_zero_debt(debt: &Amount) -> MathResult<Amount> {
    debt.max(&Amount::new(debt.brand.clone(), ZERO_DEBT_FLOOR))
}

/// Assembles the current-vault view, or `None` while any upstream cell
/// (vault, manager, price, params, metrics) is still absent.
pub(crate) fn derive_vault_to_adjust(
    ledger: &LedgerState,
    key: Option<&VaultKey>,
) -> MathResult<Option<VaultToAdjust>> {
    let Some(key) = key else { return Ok(None) };
    let Some(vault) = ledger.vault(key) else {
        return Ok(None);
    };
    let Some(manager) = ledger.manager(&vault.manager_id) else {
        return Ok(None);
    };
    let Some(price) = ledger.price(&vault.locked.brand) else {
        return Ok(None);
    };
    let Some(params) = ledger.params(&vault.manager_id) else {
        return Ok(None);
    };
    let Some(metrics) = ledger.metrics(&vault.manager_id) else {
        return Ok(None);
    };

    let total_locked_value = ceil_multiply(&vault.locked, &price.price_rate()?)?;
    let total_debt = calculate_current_debt(
        &vault.debt_snapshot.debt,
        &vault.debt_snapshot.interest,
        &manager.compounded_interest,
    )?;
    let collateralization_ratio =
        Ratio::from_amounts(total_locked_value.clone(), floor_zero_debt(&total_debt)?)?;

    Ok(Some(VaultToAdjust {
        total_locked_value,
        total_debt,
        collateral_price: price.clone(),
        locked: vault.locked.clone(),
        index_within_manager: vault.index_within_manager,
        params: params.clone(),
        metrics: metrics.clone(),
        collateralization_ratio,
        created_by_offer_id: vault.created_by_offer_id.clone(),
        vault_state: vault.vault_state,
    }))
}

/// Projects the vault past the proposed deltas
pub(crate) fn derive_vault_after_adjustment(
    vault: &VaultToAdjust,
    collateral_action: CollateralAction,
    debt_action: DebtAction,
    collateral_delta: Option<u64>,
    debt_delta: Option<u64>,
) -> MathResult<VaultAfterAdjustment> {
    let debt_delta = debt_delta.map(|value| Amount::new(vault.total_debt.brand.clone(), value));
    let collateral_delta =
        collateral_delta.map(|value| Amount::new(vault.locked.brand.clone(), value));

    let new_debt = debt_after_delta(
        debt_action,
        &vault.params.loan_fee,
        &vault.total_debt,
        debt_delta.as_ref(),
    )?;
    let new_locked =
        locked_after_delta(collateral_action, &vault.locked, collateral_delta.as_ref())?;

    let new_locked_value = ceil_multiply(&new_locked, &vault.collateral_price.price_rate()?)?;
    let new_collateralization_ratio =
        Ratio::from_amounts(new_locked_value, floor_zero_debt(&new_debt)?)?;

    Ok(VaultAfterAdjustment {
        new_debt,
        new_locked,
        new_collateralization_ratio,
    })
}
