//! The Vault Store
//!
//! Owner of every cell in the derivation graph. All writes, ledger updates
//! from the ingestion layer and user edits alike, go through this facade:
//! each one writes a single input cell, runs that cell's write handler if it
//! has one, then synchronously recomputes every derived cell in dependency
//! order. A reader between writes always observes a fully-consistent state;
//! nothing is ever read mid-update.
//!
//! Dependency order of the recompute pass:
//!
//! 1. current-vault view (ledger cells + vault selection)
//! 2. projected vault (view + actions + deltas)
//! 3. adjustment errors (view + projection + purses + limits)
//! 4. creation errors (solver cells + purses + limits)
//! 5. commit-readiness flags
//!
//! Mutating methods return `Err` only for caller precondition violations
//! (brand-inconsistent ledger data): a defect, never a validation outcome.

use std::collections::BTreeMap;

use tracing::trace;
use vaultsmith_common::{Amount, Brand, MathResult, Ratio};

use crate::adjust::{
    derive_vault_after_adjustment, derive_vault_to_adjust, AdjustState, CollateralAction,
    DebtAction, VaultAfterAdjustment, VaultToAdjust,
};
use crate::cell::Derived;
use crate::create::CreateState;
use crate::ledger::LedgerState;
use crate::types::{
    FactoryParams, Manager, ManagerId, ManagerMetrics, ManagerParams, PriceQuote, VaultKey,
    VaultSnapshot,
};
use crate::validation::{
    adjustment_ready, creation_ready, derive_adjust_errors, derive_creation_errors,
    AdjustVaultErrors, VaultCreationErrors,
};

/// The reactive store: input cells plus their derived views
#[derive(Debug, Default)]
pub struct VaultStore {
    ledger: LedgerState,
    adjust: AdjustState,
    create: CreateState,

    vault_to_adjust: Derived<VaultToAdjust>,
    vault_after_adjustment: Derived<VaultAfterAdjustment>,
    adjust_errors: AdjustVaultErrors,
    creation_errors: VaultCreationErrors,
    adjustment_ready: bool,
    creation_ready: bool,
}

impl VaultStore {
    /// An empty store; every cell starts absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes every derived cell from the current inputs
    fn recompute(&mut self) -> MathResult<()> {
        let vault = derive_vault_to_adjust(&self.ledger, self.adjust.vault_key())?;
        let after = match &vault {
            Some(vault) => Some(derive_vault_after_adjustment(
                vault,
                self.adjust.collateral_action(),
                self.adjust.debt_action(),
                self.adjust.collateral_delta(),
                self.adjust.debt_delta(),
            )?),
            None => None,
        };

        self.adjust_errors = match (&vault, &after) {
            (Some(vault), Some(after)) => derive_adjust_errors(
                &self.ledger,
                vault,
                after,
                self.adjust.collateral_action(),
                self.adjust.debt_action(),
                self.adjust.collateral_delta(),
                self.adjust.debt_delta(),
            )?,
            _ => AdjustVaultErrors::default(),
        };
        self.creation_errors = derive_creation_errors(&self.ledger, &self.create)?;

        self.adjustment_ready = match &vault {
            Some(vault) => adjustment_ready(
                vault,
                &self.adjust_errors,
                self.adjust.collateral_delta(),
                self.adjust.debt_delta(),
            ),
            None => false,
        };
        self.creation_ready = creation_ready(&self.create, &self.creation_errors);

        self.vault_to_adjust.write(vault);
        self.vault_after_adjustment.write(after);
        trace!(
            adjustment_ready = self.adjustment_ready,
            creation_ready = self.creation_ready,
            "derived cells recomputed"
        );
        Ok(())
    }

    // ======== Ledger writes (external ingestion layer) ========

    pub fn update_vault(&mut self, key: VaultKey, vault: VaultSnapshot) -> MathResult<()> {
        self.ledger.set_vault(key, vault);
        self.recompute()
    }

    pub fn remove_vault(&mut self, key: &VaultKey) -> MathResult<()> {
        self.ledger.remove_vault(key);
        self.recompute()
    }

    pub fn update_manager(&mut self, id: ManagerId, manager: Manager) -> MathResult<()> {
        self.ledger.set_manager(id, manager);
        self.recompute()
    }

    pub fn update_manager_params(&mut self, id: ManagerId, params: ManagerParams) -> MathResult<()> {
        self.ledger.set_params(id, params);
        self.recompute()
    }

    pub fn update_manager_metrics(
        &mut self,
        id: ManagerId,
        metrics: ManagerMetrics,
    ) -> MathResult<()> {
        self.ledger.set_metrics(id, metrics);
        self.recompute()
    }

    pub fn update_price(&mut self, quote: PriceQuote) -> MathResult<()> {
        self.ledger.set_price(quote);
        self.recompute()
    }

    pub fn update_purses(&mut self, balances: BTreeMap<Brand, Amount>) -> MathResult<()> {
        self.ledger.set_purses(balances);
        self.recompute()
    }

    /// Marks the wallet as disconnected
    pub fn clear_purses(&mut self) -> MathResult<()> {
        self.ledger.clear_purses();
        self.recompute()
    }

    pub fn update_factory_params(&mut self, params: FactoryParams) -> MathResult<()> {
        self.ledger.set_factory_params(params);
        self.recompute()
    }

    // ======== Adjustment edits ========

    /// Focuses the adjustment graph on one vault
    pub fn select_vault(&mut self, key: VaultKey) -> MathResult<()> {
        self.adjust.select_vault(key);
        self.recompute()
    }

    pub fn clear_vault_selection(&mut self) -> MathResult<()> {
        self.adjust.clear_vault_selection();
        self.recompute()
    }

    pub fn set_collateral_action(&mut self, action: CollateralAction) -> MathResult<()> {
        self.adjust.set_collateral_action(action);
        self.recompute()
    }

    pub fn set_debt_action(&mut self, action: DebtAction) -> MathResult<()> {
        self.adjust.set_debt_action(action);
        self.recompute()
    }

    pub fn set_collateral_delta(&mut self, value: u64) -> MathResult<()> {
        self.adjust.set_collateral_delta(value);
        self.recompute()
    }

    pub fn set_debt_delta(&mut self, value: u64) -> MathResult<()> {
        self.adjust.set_debt_delta(value);
        self.recompute()
    }

    // ======== Creation edits ========

    pub fn set_amount_to_lock(&mut self, value: u64) -> MathResult<()> {
        self.create.set_value_to_lock(&self.ledger, value)?;
        self.recompute()
    }

    pub fn set_amount_to_receive(&mut self, value: u64) -> MathResult<()> {
        self.create.set_value_to_receive(&self.ledger, value)?;
        self.recompute()
    }

    pub fn set_target_ratio(&mut self, ratio: Ratio) -> MathResult<()> {
        self.create.set_collateralization_ratio(&self.ledger, ratio)?;
        self.recompute()
    }

    pub fn select_collateral_kind(&mut self, id: Option<ManagerId>) -> MathResult<()> {
        self.create.select_collateral_kind(&self.ledger, id)?;
        self.recompute()
    }

    // ======== Derived reads ========

    pub fn ledger(&self) -> &LedgerState {
        &self.ledger
    }

    /// Current state of the selected vault, absent until every upstream
    /// ledger cell it needs is populated
    pub fn vault_to_adjust(&self) -> Option<&VaultToAdjust> {
        self.vault_to_adjust.get()
    }

    /// Projected state after the proposed adjustment
    pub fn vault_after_adjustment(&self) -> Option<&VaultAfterAdjustment> {
        self.vault_after_adjustment.get()
    }

    pub fn adjust_errors(&self) -> &AdjustVaultErrors {
        &self.adjust_errors
    }

    pub fn creation_errors(&self) -> &VaultCreationErrors {
        &self.creation_errors
    }

    pub fn collateral_action(&self) -> CollateralAction {
        self.adjust.collateral_action()
    }

    pub fn debt_action(&self) -> DebtAction {
        self.adjust.debt_action()
    }

    pub fn collateral_delta(&self) -> Option<u64> {
        self.adjust.collateral_delta()
    }

    pub fn debt_delta(&self) -> Option<u64> {
        self.adjust.debt_delta()
    }

    /// The collateral delta as a branded amount of the vault's collateral
    pub fn collateral_delta_amount(&self) -> Option<Amount> {
        let vault = self.vault_to_adjust.get()?;
        let value = self.adjust.collateral_delta()?;
        Some(Amount::new(vault.locked.brand.clone(), value))
    }

    /// The debt delta as a branded amount of the vault's debt asset
    pub fn debt_delta_amount(&self) -> Option<Amount> {
        let vault = self.vault_to_adjust.get()?;
        let value = self.adjust.debt_delta()?;
        Some(Amount::new(vault.total_debt.brand.clone(), value))
    }

    pub fn selected_collateral_id(&self) -> Option<&ManagerId> {
        self.create.selected_collateral_id()
    }

    pub fn value_to_lock(&self) -> Option<u64> {
        self.create.value_to_lock()
    }

    pub fn value_to_receive(&self) -> Option<u64> {
        self.create.value_to_receive()
    }

    pub fn target_collateralization_ratio(&self) -> Option<&Ratio> {
        self.create.collateralization_ratio()
    }

    /// The lock side as a branded amount of the selected collateral
    pub fn amount_to_lock(&self) -> Option<Amount> {
        let id = self.create.selected_collateral_id()?;
        let brand = self
            .ledger
            .metrics(id)
            .map(|metrics| metrics.retained_collateral.brand.clone())?;
        Some(Amount::new(brand, self.create.value_to_lock()?))
    }

    /// The receive side as a branded amount of the debt asset
    pub fn amount_to_receive(&self) -> Option<Amount> {
        let id = self.create.selected_collateral_id()?;
        let brand = self
            .ledger
            .params(id)
            .map(|params| params.debt_limit.brand.clone())
            .or_else(|| {
                self.ledger
                    .factory_params()
                    .map(|params| params.min_initial_debt.brand.clone())
            })?;
        Some(Amount::new(brand, self.create.value_to_receive()?))
    }

    /// True when the proposed adjustment can be turned into an offer
    pub fn adjustment_ready(&self) -> bool {
        self.adjustment_ready
    }

    /// True when the creation triple can be turned into an offer
    pub fn creation_ready(&self) -> bool {
        self.creation_ready
    }
}
