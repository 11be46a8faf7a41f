//! Vault Creation Model
//!
//! A bidirectional solver over three user-editable cells (collateral to
//! lock, debt to receive, and the target collateralization ratio) related
//! through the selected collateral's price:
//!
//! `toLock × priceRate  =  lockedValue  =  toReceive × targetRatio`
//!
//! Each edit is a one-shot forward recomputation pushed into the sibling
//! *input* cell by the edited cell's write handler; no derived cell depends
//! on another, so no cycle exists to detect. The ratio is the control knob:
//! editing it re-solves the receive side while the lock side stays sticky.

use tracing::debug;
use vaultsmith_common::{MathResult, Ratio};

use crate::cell::Input;
use crate::ledger::LedgerState;
use crate::math::{compute_to_lock, compute_to_receive};
use crate::types::ManagerId;

/// Price and default ratio for the selected collateral kind, each absent
/// until its ledger cell is populated
struct VaultInputData {
    price_rate: Option<Ratio>,
    default_ratio: Option<Ratio>,
}

fn vault_input_data(ledger: &LedgerState, id: &str) -> MathResult<VaultInputData> {
    let collateral_brand = ledger
        .metrics(id)
        .map(|metrics| metrics.retained_collateral.brand.clone());

    let price_rate = match &collateral_brand {
        Some(brand) => ledger
            .price(brand)
            .map(|quote| quote.price_rate())
            .transpose()?,
        None => None,
    };

    let default_ratio = ledger
        .params(id)
        .map(|params| params.liquidation_margin.clone());

    Ok(VaultInputData {
        price_rate,
        default_ratio,
    })
}

/// Input cells of the creation solver
#[derive(Debug, Default)]
pub struct CreateState {
    selected_collateral_id: Input<ManagerId>,
    value_to_lock: Input<u64>,
    value_to_receive: Input<u64>,
    collateralization_ratio: Input<Ratio>,
}

impl CreateState {
    /// Writes the lock side and re-solves the receive side, provided the
    /// price, default ratio, and target ratio are all known. With
    /// insufficient data the receive side is left untouched.
    pub(crate) fn set_value_to_lock(&mut self, ledger: &LedgerState, value: u64) -> MathResult<()> {
        self.value_to_lock.set(value);

        let Some(id) = self.selected_collateral_id.get().cloned() else {
            return Ok(());
        };
        let data = vault_input_data(ledger, &id)?;
        let ratio = self.collateralization_ratio.get().cloned();

        if let (Some(price), Some(default), Some(ratio)) =
            (data.price_rate, data.default_ratio, ratio)
        {
            let receive = compute_to_receive(&price, &ratio, value, &default)?;
            debug!(lock = value, receive, "lock edit solved receive");
            self.value_to_receive.set(receive);
        }
        Ok(())
    }

    /// Writes the receive side and re-solves the lock side, symmetrically
    pub(crate) fn set_value_to_receive(
        &mut self,
        ledger: &LedgerState,
        value: u64,
    ) -> MathResult<()> {
        self.value_to_receive.set(value);

        let Some(id) = self.selected_collateral_id.get().cloned() else {
            return Ok(());
        };
        let data = vault_input_data(ledger, &id)?;
        let ratio = self.collateralization_ratio.get().cloned();

        if let (Some(price), Some(default), Some(ratio)) =
            (data.price_rate, data.default_ratio, ratio)
        {
            let lock = compute_to_lock(&price, &ratio, value, &default)?;
            debug!(receive = value, lock, "receive edit solved lock");
            self.value_to_lock.set(lock);
        }
        Ok(())
    }

    /// Writes the target ratio and re-solves the receive side from the
    /// sticky lock side. A zero lock amount has nothing to solve from.
    pub(crate) fn set_collateralization_ratio(
        &mut self,
        ledger: &LedgerState,
        ratio: Ratio,
    ) -> MathResult<()> {
        self.collateralization_ratio.set(ratio.clone());

        let (Some(lock), Some(id)) = (
            self.value_to_lock.get().copied().filter(|v| *v > 0),
            self.selected_collateral_id.get().cloned(),
        ) else {
            return Ok(());
        };
        let data = vault_input_data(ledger, &id)?;

        if let (Some(price), Some(default)) = (data.price_rate, data.default_ratio) {
            let receive = compute_to_receive(&price, &ratio, lock, &default)?;
            self.value_to_receive.set(receive);
        }
        Ok(())
    }

    /// Selects a collateral kind and seeds the solver: ratio from the
    /// kind's default, receive from the protocol's minimum initial debt,
    /// lock solved from those two. Any cell whose seed is unavailable is
    /// cleared to absent rather than left stale. Passing `None` deselects
    /// and clears everything.
    pub(crate) fn select_collateral_kind(
        &mut self,
        ledger: &LedgerState,
        id: Option<ManagerId>,
    ) -> MathResult<()> {
        let Some(id) = id else {
            self.selected_collateral_id.clear();
            self.value_to_receive.clear();
            self.value_to_lock.clear();
            self.collateralization_ratio.clear();
            return Ok(());
        };

        debug!(manager = %id, "collateral kind selected");
        self.selected_collateral_id.set(id.clone());
        let data = vault_input_data(ledger, &id)?;

        match &data.default_ratio {
            Some(default) => self.collateralization_ratio.set(default.clone()),
            None => self.collateralization_ratio.clear(),
        }

        let min_initial_debt = ledger
            .factory_params()
            .map(|params| params.min_initial_debt.clone());
        match &min_initial_debt {
            Some(min) => self.value_to_receive.set(min.value),
            None => self.value_to_receive.clear(),
        }

        if let (Some(default), Some(price), Some(min)) =
            (data.default_ratio, data.price_rate, min_initial_debt)
        {
            let lock = compute_to_lock(&price, &default, min.value, &default)?;
            self.value_to_lock.set(lock);
        } else {
            self.value_to_lock.clear();
        }
        Ok(())
    }

    pub fn selected_collateral_id(&self) -> Option<&ManagerId> {
        self.selected_collateral_id.get()
    }

    pub fn value_to_lock(&self) -> Option<u64> {
        self.value_to_lock.get().copied()
    }

    pub fn value_to_receive(&self) -> Option<u64> {
        self.value_to_receive.get().copied()
    }

    pub fn collateralization_ratio(&self) -> Option<&Ratio> {
        self.collateralization_ratio.get()
    }
}
