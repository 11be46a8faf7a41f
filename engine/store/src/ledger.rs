//! Externally-Populated Ledger State
//!
//! The input cells the host's ingestion layer writes: vault snapshots,
//! manager records, governed parameters, metrics, price quotes, purse
//! balances, and factory parameters. The engine never fetches any of this
//! itself; data arrives only through the store's write surface, and each
//! record is replaced wholesale.
//!
//! Purse balances are doubly optional: the whole map absent means no wallet
//! is connected, which validation reports differently from a connected
//! wallet that simply lacks a purse for some brand.

use std::collections::BTreeMap;

use tracing::debug;
use vaultsmith_common::{Amount, Brand};

use crate::cell::Input;
use crate::types::{
    FactoryParams, Manager, ManagerId, ManagerMetrics, ManagerParams, PriceQuote, VaultKey,
    VaultSnapshot,
};

/// All ledger-sourced input cells, exclusively owned by the store
#[derive(Debug, Default)]
pub struct LedgerState {
    vaults: BTreeMap<VaultKey, VaultSnapshot>,
    managers: BTreeMap<ManagerId, Manager>,
    params: BTreeMap<ManagerId, ManagerParams>,
    metrics: BTreeMap<ManagerId, ManagerMetrics>,
    prices: BTreeMap<Brand, PriceQuote>,
    purses: Input<BTreeMap<Brand, Amount>>,
    factory_params: Input<FactoryParams>,
}

impl LedgerState {
    pub(crate) fn set_vault(&mut self, key: VaultKey, vault: VaultSnapshot) {
        debug!(manager = %key.manager_id, index = key.index_within_manager, "vault updated");
        self.vaults.insert(key, vault);
    }

    pub(crate) fn remove_vault(&mut self, key: &VaultKey) {
        debug!(manager = %key.manager_id, index = key.index_within_manager, "vault removed");
        self.vaults.remove(key);
    }

    pub(crate) fn set_manager(&mut self, id: ManagerId, manager: Manager) {
        debug!(manager = %id, "manager updated");
        self.managers.insert(id, manager);
    }

    pub(crate) fn set_params(&mut self, id: ManagerId, params: ManagerParams) {
        debug!(manager = %id, "governed params updated");
        self.params.insert(id, params);
    }

    pub(crate) fn set_metrics(&mut self, id: ManagerId, metrics: ManagerMetrics) {
        debug!(manager = %id, "metrics updated");
        self.metrics.insert(id, metrics);
    }

    /// Quotes are keyed by their collateral (input-side) brand
    pub(crate) fn set_price(&mut self, quote: PriceQuote) {
        debug!(brand = %quote.amount_in.brand, "price updated");
        self.prices.insert(quote.amount_in.brand.clone(), quote);
    }

    pub(crate) fn set_purses(&mut self, balances: BTreeMap<Brand, Amount>) {
        debug!(purse_count = balances.len(), "purse balances updated");
        self.purses.set(balances);
    }

    /// Marks the balance source as disconnected
    pub(crate) fn clear_purses(&mut self) {
        debug!("purse balances cleared");
        self.purses.clear();
    }

    pub(crate) fn set_factory_params(&mut self, params: FactoryParams) {
        debug!("factory params updated");
        self.factory_params.set(params);
    }

    pub fn vault(&self, key: &VaultKey) -> Option<&VaultSnapshot> {
        self.vaults.get(key)
    }

    pub fn manager(&self, id: &str) -> Option<&Manager> {
        self.managers.get(id)
    }

    pub fn params(&self, id: &str) -> Option<&ManagerParams> {
        self.params.get(id)
    }

    pub fn metrics(&self, id: &str) -> Option<&ManagerMetrics> {
        self.metrics.get(id)
    }

    pub fn price(&self, brand: &Brand) -> Option<&PriceQuote> {
        self.prices.get(brand)
    }

    /// True when a balance source (wallet) is connected at all
    pub fn purses_connected(&self) -> bool {
        self.purses.is_set()
    }

    /// Balance of `brand`, if a wallet is connected and holds such a purse
    pub fn purse_balance(&self, brand: &Brand) -> Option<&Amount> {
        self.purses.get().and_then(|balances| balances.get(brand))
    }

    pub fn factory_params(&self) -> Option<&FactoryParams> {
        self.factory_params.get()
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
    fn test_price_keyed_by_collateral_brand() {
        let mut ledger = LedgerState::default();
        ledger.set_price(PriceQuote {
            amount_in: atom(1),
            amount_out: ist(7),
        });
        assert!(ledger.price(&Brand::new("ATOM")).is_some());
        assert!(ledger.price(&Brand::new("IST")).is_none());
    }

    #[test]
    fn test_purses_absent_vs_empty() {
        let mut ledger = LedgerState::default();
        assert!(!ledger.purses_connected());

        ledger.set_purses(BTreeMap::new());
        assert!(ledger.purses_connected());
        assert!(ledger.purse_balance(&Brand::new("ATOM")).is_none());

        ledger.clear_purses();
        assert!(!ledger.purses_connected());
    }

    #[test]
    fn test_vault_replaced_wholesale() {
        let mut ledger = LedgerState::default();
        let key = VaultKey::new("manager0", 0);
        let mut vault = crate::types::VaultSnapshot {
            locked: atom(100),
            debt_snapshot: crate::types::DebtSnapshot {
                debt: ist(50),
                interest: vaultsmith_common::Ratio::percent(100, Brand::new("IST")),
            },
            manager_id: "manager0".into(),
            created_by_offer_id: "offer1".into(),
            index_within_manager: 0,
            vault_state: crate::types::VaultState::Active,
        };
        ledger.set_vault(key.clone(), vault.clone());
        assert_eq!(ledger.vault(&key).unwrap().locked, atom(100));

        vault.locked = atom(150);
        ledger.set_vault(key.clone(), vault);
        assert_eq!(ledger.vault(&key).unwrap().locked, atom(150));

        ledger.remove_vault(&key);
        assert!(ledger.vault(&key).is_none());
    }
}
