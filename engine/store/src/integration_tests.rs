//! End-to-end scenarios over the whole store
//!
//! Exercises the full write surface the way a host would: ledger ingestion,
//! vault selection, user edits, and the derived outputs a UI consumes.

use std::collections::BTreeMap;

use vaultsmith_common::{ratio_equal, ratio_gte, Amount, Brand, Ratio};

use crate::adjust::{CollateralAction, DebtAction};
use crate::store::VaultStore;
use crate::types::{
    DebtSnapshot, FactoryParams, Manager, ManagerMetrics, ManagerParams, PriceQuote, VaultKey,
    VaultSnapshot, VaultState,
};
use crate::validation::DebtError;

fn ist(value: u64) -> Amount {
    Amount::new(Brand::new("IST"), value)
}

fn atom(value: u64) -> Amount {
    Amount::new(Brand::new("ATOM"), value)
}

fn pct(value: u64) -> Ratio {
    Ratio::percent(value, Brand::new("IST"))
}

fn unit_coefficient() -> Ratio {
    pct(100)
}

fn vault_snapshot(locked: u64, debt: u64) -> VaultSnapshot {
    VaultSnapshot {
        locked: atom(locked),
        debt_snapshot: DebtSnapshot {
            debt: ist(debt),
            interest: unit_coefficient(),
        },
        manager_id: "manager0".into(),
        created_by_offer_id: "offer1".into(),
        index_within_manager: 0,
        vault_state: VaultState::Active,
    }
}

fn manager_params(debt_limit: u64) -> ManagerParams {
    ManagerParams {
        liquidation_margin: pct(150),
        inferred_minimum_collateralization: pct(150),
        interest_rate: pct(2),
        loan_fee: pct(1),
        debt_limit: ist(debt_limit),
    }
}

fn manager_metrics(total_debt: u64) -> ManagerMetrics {
    ManagerMetrics {
        total_debt: ist(total_debt),
        total_collateral: atom(1_000_000),
        retained_collateral: atom(0),
    }
}

fn price_quote(out_per_unit: u64) -> PriceQuote {
    PriceQuote {
        amount_in: atom(1),
        amount_out: ist(out_per_unit),
    }
}

fn full_purses() -> BTreeMap<Brand, Amount> {
    BTreeMap::from([
        (Brand::new("IST"), ist(1_000_000)),
        (Brand::new("ATOM"), atom(1_000_000)),
    ])
}

/// The standard scenario: locked 100 ATOM at 2 IST/ATOM, 50 IST debt,
/// 150% minimum, 1% loan fee.
fn populated_store() -> (VaultStore, VaultKey) {
    let mut store = VaultStore::new();
    let key = VaultKey::new("manager0", 0);
    store.update_vault(key.clone(), vault_snapshot(100, 50)).unwrap();
    store
        .update_manager(
            "manager0".into(),
            Manager {
                compounded_interest: unit_coefficient(),
            },
        )
        .unwrap();
    store.update_price(price_quote(2)).unwrap();
    store
        .update_manager_params("manager0".into(), manager_params(1_000_000))
        .unwrap();
    store
        .update_manager_metrics("manager0".into(), manager_metrics(0))
        .unwrap();
    store.update_purses(full_purses()).unwrap();
    store
        .update_factory_params(FactoryParams {
            min_initial_debt: ist(50),
        })
        .unwrap();
    (store, key)
}

#[test]
fn healthy_vault_then_overborrow() {
    let (mut store, key) = populated_store();
    store.select_vault(key).unwrap();

    // lockedValue 200 against debt 50: 400%, comfortably above 150%
    let view = store.vault_to_adjust().unwrap();
    assert!(ratio_equal(&view.collateralization_ratio, &pct(400)).unwrap());
    assert!(store.adjust_errors().is_empty());

    // Borrow 100 more: fee 1 makes newDebt 151; 200/151 is below 150%
    store.set_debt_action(DebtAction::Borrow).unwrap();
    store.set_debt_delta(100).unwrap();

    let after = store.vault_after_adjustment().unwrap();
    assert_eq!(after.new_debt, ist(151));
    assert!(!ratio_gte(&after.new_collateralization_ratio, &pct(150)).unwrap());
    assert_eq!(
        store.adjust_errors().debt_error,
        Some(DebtError::BelowMinimumRatio)
    );
    assert!(!store.adjustment_ready());
}

#[test]
fn repay_decreases_debt_by_exactly_delta() {
    let (mut store, key) = populated_store();
    store.select_vault(key).unwrap();
    store.set_debt_action(DebtAction::Repay).unwrap();
    store.set_debt_delta(20).unwrap();

    assert_eq!(store.vault_after_adjustment().unwrap().new_debt, ist(30));
    assert!(store.adjust_errors().is_empty());
    assert!(store.adjustment_ready());
}

#[test]
fn creation_solver_walkthrough() {
    let (mut store, _) = populated_store();
    store.select_collateral_kind(Some("manager0".into())).unwrap();
    store.set_target_ratio(pct(200)).unwrap();

    // Lock 100 at price 2: lockedValue 200; at 200% receive 100
    store.set_amount_to_lock(100).unwrap();
    assert_eq!(store.value_to_receive(), Some(100));

    // Edit receive to 150: margin 300; at price 2 lock becomes 150
    store.set_amount_to_receive(150).unwrap();
    assert_eq!(store.value_to_lock(), Some(150));

    assert!(store.creation_errors().is_empty());
    assert!(store.creation_ready());
}

#[test]
fn collateral_selection_seeds_solver() {
    let (mut store, _) = populated_store();
    // Re-quote at 1:1 for the seeding example
    store.update_price(price_quote(1)).unwrap();
    store.select_collateral_kind(Some("manager0".into())).unwrap();

    // min debt 50, default ratio 150%, price 1:1: lock = ceil(50 * 1.5) = 75
    assert_eq!(store.value_to_receive(), Some(50));
    assert_eq!(store.value_to_lock(), Some(75));
    assert!(ratio_equal(store.target_collateralization_ratio().unwrap(), &pct(150)).unwrap());
}

#[test]
fn zero_debt_vault_never_divides_by_zero() {
    let (mut store, key) = populated_store();
    store.update_vault(key.clone(), vault_snapshot(100, 0)).unwrap();
    store.select_vault(key).unwrap();

    let view = store.vault_to_adjust().unwrap();
    assert!(view.total_debt.is_zero());
    // The ratio exists (floored denominator); zero debt is the signal
    // consumers must use, not the numeric ratio
    assert_eq!(view.collateralization_ratio.denominator, ist(1));

    // Withdrawing everything from a debt-free vault is legitimate
    store.set_collateral_action(CollateralAction::Withdraw).unwrap();
    store.set_collateral_delta(100).unwrap();
    assert!(store.adjust_errors().is_empty());
    assert!(store.adjustment_ready());
}

#[test]
fn interest_accrual_flows_into_view() {
    let (mut store, key) = populated_store();
    store.select_vault(key).unwrap();
    assert_eq!(store.vault_to_adjust().unwrap().total_debt, ist(50));

    // Manager coefficient moves 100% -> 110%: debt accrues to 55
    store
        .update_manager(
            "manager0".into(),
            Manager {
                compounded_interest: pct(110),
            },
        )
        .unwrap();
    assert_eq!(store.vault_to_adjust().unwrap().total_debt, ist(55));
}

#[test]
fn price_tick_mid_edit_reprices_everything() {
    let (mut store, key) = populated_store();
    store.select_vault(key).unwrap();
    store.set_debt_action(DebtAction::Borrow).unwrap();
    store.set_debt_delta(100).unwrap();
    assert_eq!(
        store.adjust_errors().debt_error,
        Some(DebtError::BelowMinimumRatio)
    );

    // Collateral doubles in value: 400/151 clears the minimum
    store.update_price(price_quote(4)).unwrap();
    assert!(store.adjust_errors().is_empty());
    assert!(store.adjustment_ready());
}

#[test]
fn view_appears_only_after_every_upstream_cell() {
    let mut store = VaultStore::new();
    let key = VaultKey::new("manager0", 0);
    store.select_vault(key.clone()).unwrap();
    assert!(store.vault_to_adjust().is_none());

    store.update_vault(key, vault_snapshot(100, 50)).unwrap();
    assert!(store.vault_to_adjust().is_none());
    store
        .update_manager(
            "manager0".into(),
            Manager {
                compounded_interest: unit_coefficient(),
            },
        )
        .unwrap();
    assert!(store.vault_to_adjust().is_none());
    store.update_price(price_quote(2)).unwrap();
    assert!(store.vault_to_adjust().is_none());
    store
        .update_manager_params("manager0".into(), manager_params(1_000_000))
        .unwrap();
    assert!(store.vault_to_adjust().is_none());

    // Metrics complete the dependency set
    store
        .update_manager_metrics("manager0".into(), manager_metrics(0))
        .unwrap();
    assert!(store.vault_to_adjust().is_some());
}

#[test]
fn independent_write_order_does_not_matter() {
    let key = VaultKey::new("manager0", 0);

    let build = |order: &[u8]| {
        let mut store = VaultStore::new();
        for step in order {
            match step {
                0 => store.update_vault(key.clone(), vault_snapshot(100, 50)).unwrap(),
                1 => store
                    .update_manager(
                        "manager0".into(),
                        Manager {
                            compounded_interest: unit_coefficient(),
                        },
                    )
                    .unwrap(),
                2 => store.update_price(price_quote(2)).unwrap(),
                3 => store
                    .update_manager_params("manager0".into(), manager_params(1_000_000))
                    .unwrap(),
                4 => store
                    .update_manager_metrics("manager0".into(), manager_metrics(0))
                    .unwrap(),
                5 => store.update_purses(full_purses()).unwrap(),
                _ => unreachable!(),
            }
        }
        store.select_vault(key.clone()).unwrap();
        store.set_debt_action(DebtAction::Borrow).unwrap();
        store.set_debt_delta(10).unwrap();
        store
    };

    let forward = build(&[0, 1, 2, 3, 4, 5]);
    let shuffled = build(&[5, 3, 1, 4, 2, 0]);

    assert_eq!(forward.vault_to_adjust(), shuffled.vault_to_adjust());
    assert_eq!(
        forward.vault_after_adjustment(),
        shuffled.vault_after_adjustment()
    );
    assert_eq!(forward.adjust_errors(), shuffled.adjust_errors());
    assert_eq!(forward.adjustment_ready(), shuffled.adjustment_ready());
}

#[test]
fn repeated_edit_is_idempotent() {
    let (mut store, key) = populated_store();
    store.select_vault(key).unwrap();
    store.set_collateral_action(CollateralAction::Deposit).unwrap();

    store.set_collateral_delta(30).unwrap();
    let once = store.vault_after_adjustment().cloned();
    store.set_collateral_delta(30).unwrap();
    let twice = store.vault_after_adjustment().cloned();
    assert_eq!(once, twice);
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use vaultsmith_common::{ceil_multiply, ratio_gte};

    fn collateralization(locked: u64, debt: u64, price_out: u64) -> Ratio {
        let rate = price_quote(price_out).price_rate().unwrap();
        let value = ceil_multiply(&atom(locked), &rate).unwrap();
        let floored = ist(debt.max(1));
        Ratio::from_amounts(value, floored).unwrap()
    }

    proptest! {
        /// More collateral never lowers the ratio (price and debt fixed)
        #[test]
        fn ratio_monotone_in_locked(
            locked in 0u64..1_000_000,
            extra in 0u64..1_000_000,
            debt in 0u64..1_000_000,
            price in 1u64..1_000,
        ) {
            let smaller = collateralization(locked, debt, price);
            let larger = collateralization(locked + extra, debt, price);
            prop_assert!(ratio_gte(&larger, &smaller).unwrap());
        }

        /// More debt never raises the ratio (price and collateral fixed)
        #[test]
        fn ratio_antitone_in_debt(
            locked in 0u64..1_000_000,
            debt in 0u64..1_000_000,
            extra in 0u64..1_000_000,
            price in 1u64..1_000,
        ) {
            let lighter = collateralization(locked, debt, price);
            let heavier = collateralization(locked, debt + extra, price);
            prop_assert!(ratio_gte(&lighter, &heavier).unwrap());
        }
    }
}

#[test]
fn wallet_disconnect_surfaces_as_creation_error() {
    let (mut store, _) = populated_store();
    store.select_collateral_kind(Some("manager0".into())).unwrap();
    assert!(store.creation_errors().is_empty());

    store.clear_purses().unwrap();
    assert_eq!(
        store.creation_errors().to_lock_error,
        Some(crate::validation::LockError::NoBalanceSource)
    );
    assert!(!store.creation_ready());
}
