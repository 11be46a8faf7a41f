//! Validation Engine
//!
//! Pure derivation of user-facing error conditions from the current derived
//! state, purse balances, and protocol limits. Outcomes are data, never
//! failures: the engine always produces a well-formed error set (possibly
//! empty) even for a thoroughly invalid position. At most one error is
//! reported per axis; within an axis, later rules overwrite earlier ones,
//! so the most specific condition wins.

use serde::{Deserialize, Serialize};
use vaultsmith_common::{ratio_gte, Amount, MathError, MathResult};

use crate::adjust::{CollateralAction, DebtAction, VaultAfterAdjustment, VaultToAdjust};
use crate::create::CreateState;
use crate::ledger::LedgerState;

/// Debt-axis error codes for an adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtError {
    /// Borrowing would push the ratio below the manager's minimum
    BelowMinimumRatio,
    /// Repay purse is missing or holds less than the repay delta
    InsufficientFunds,
    /// Repay delta exceeds the outstanding debt
    RepayExceedsDebt,
    /// Requested increase exceeds the manager's remaining debt headroom
    ExceedsDebtCeiling,
}

/// Collateral-axis error codes for an adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollateralError {
    /// Withdrawing would push the ratio below the manager's minimum
    BelowMinimumRatio,
    /// Deposit purse is missing or holds less than the deposit delta
    InsufficientFunds,
    /// Withdraw delta exceeds the locked collateral
    WithdrawExceedsLocked,
}

/// Ratio-axis error codes for creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioError {
    /// Target ratio is zero or below the collateral kind's default
    BelowMinimum,
}

/// Receive-axis error codes for creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiveError {
    /// Requested debt exceeds the manager's remaining headroom
    ExceedsAvailableDebt,
    /// Requested debt is below the protocol's minimum initial debt
    BelowMinimum,
}

/// Lock-axis error codes for creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockError {
    /// No wallet is connected to draw collateral from
    NoBalanceSource,
    /// Collateral purse is missing or holds less than the lock amount
    InsufficientFunds,
}

/// Error set of the adjustment graph; empty means committable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustVaultErrors {
    /// At most one collateral-axis error
    pub collateral_error: Option<CollateralError>,
    /// At most one debt-axis error
    pub debt_error: Option<DebtError>,
}

impl AdjustVaultErrors {
    /// True when no axis reports an error
    pub fn is_empty(&self) -> bool {
        self.collateral_error.is_none() && self.debt_error.is_none()
    }
}

/// Error set of the creation solver; empty means committable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultCreationErrors {
    /// At most one lock-axis error
    pub to_lock_error: Option<LockError>,
    /// At most one receive-axis error
    pub to_receive_error: Option<ReceiveError>,
    /// At most one ratio-axis error
    pub collateralization_ratio_error: Option<RatioError>,
}

impl VaultCreationErrors {
    /// True when no axis reports an error
    pub fn is_empty(&self) -> bool {
        self.to_lock_error.is_none()
            && self.to_receive_error.is_none()
            && self.collateralization_ratio_error.is_none()
    }
}

/// Remaining debt headroom under a manager's limit. Metrics already past
/// the limit mean zero headroom, not an aborted derivation.
fn debt_headroom(limit: &Amount, outstanding: &Amount) -> MathResult<Amount> {
    match limit.subtract(outstanding) {
        Ok(headroom) => Ok(headroom),
        Err(MathError::NegativeResult { .. }) => Ok(Amount::zero(limit.brand.clone())),
        Err(err) => Err(err),
    }
}

/// Derives the adjustment error set
pub(crate) fn derive_adjust_errors(
    ledger: &LedgerState,
    vault: &VaultToAdjust,
    after: &VaultAfterAdjustment,
    collateral_action: CollateralAction,
    debt_action: DebtAction,
    collateral_delta: Option<u64>,
    debt_delta: Option<u64>,
) -> MathResult<AdjustVaultErrors> {
    let mut debt_error = None;
    let mut collateral_error = None;

    // With zero projected debt the ratio is nominal (floored denominator),
    // so the minimum-ratio rule is vacuous: a debt-free position has no
    // risk to measure.
    let ratio_defined = !after.new_debt.is_zero();
    if ratio_defined
        && !ratio_gte(
            &after.new_collateralization_ratio,
            &vault.params.inferred_minimum_collateralization,
        )?
    {
        if debt_action == DebtAction::Borrow {
            debt_error = Some(DebtError::BelowMinimumRatio);
        }
        if collateral_action == CollateralAction::Withdraw {
            collateral_error = Some(CollateralError::BelowMinimumRatio);
        }
    }

    let debt_delta = debt_delta
        .filter(|value| *value > 0)
        .map(|value| Amount::new(vault.total_debt.brand.clone(), value));
    let collateral_delta = collateral_delta
        .filter(|value| *value > 0)
        .map(|value| Amount::new(vault.locked.brand.clone(), value));

    if debt_action == DebtAction::Repay {
        if let Some(delta) = &debt_delta {
            let covered = match ledger.purse_balance(&delta.brand) {
                Some(balance) => balance.is_gte(delta)?,
                None => false,
            };
            if !covered {
                debt_error = Some(DebtError::InsufficientFunds);
            }
            if !vault.total_debt.is_gte(delta)? {
                debt_error = Some(DebtError::RepayExceedsDebt);
            }
        }
    }

    if collateral_action == CollateralAction::Deposit {
        if let Some(delta) = &collateral_delta {
            let covered = match ledger.purse_balance(&delta.brand) {
                Some(balance) => balance.is_gte(delta)?,
                None => false,
            };
            if !covered {
                collateral_error = Some(CollateralError::InsufficientFunds);
            }
        }
    }

    if collateral_action == CollateralAction::Withdraw {
        if let Some(delta) = &collateral_delta {
            if !vault.locked.is_gte(delta)? {
                collateral_error = Some(CollateralError::WithdrawExceedsLocked);
            }
        }
    }

    if debt_action == DebtAction::Borrow {
        let available = debt_headroom(&vault.params.debt_limit, &vault.metrics.total_debt)?;
        let requested = after.new_debt.subtract(&vault.total_debt)?;
        if !available.is_gte(&requested)? {
            debt_error = Some(DebtError::ExceedsDebtCeiling);
        }
    }

    Ok(AdjustVaultErrors {
        collateral_error,
        debt_error,
    })
}

/// Derives the creation error set
pub(crate) fn derive_creation_errors(
    ledger: &LedgerState,
    create: &CreateState,
) -> MathResult<VaultCreationErrors> {
    let mut to_lock_error = None;
    let mut to_receive_error = None;
    let mut collateralization_ratio_error = None;

    let selected = create.selected_collateral_id();
    let value_to_receive = create.value_to_receive();
    let value_to_lock = create.value_to_lock();

    let selected_params = selected.and_then(|id| ledger.params(id));
    if let (Some(params), Some(ratio)) = (selected_params, create.collateralization_ratio()) {
        let default_ratio = &params.liquidation_margin;
        if ratio.numerator_is_zero() || !ratio_gte(ratio, default_ratio)? {
            collateralization_ratio_error = Some(RatioError::BelowMinimum);
        }
    }

    let selected_metrics = selected.and_then(|id| ledger.metrics(id));
    if let (Some(metrics), Some(params), Some(receive)) = (
        selected_metrics,
        selected_params,
        value_to_receive.filter(|value| *value > 0),
    ) {
        let available = debt_headroom(&params.debt_limit, &metrics.total_debt)?;
        if available.value < receive {
            to_receive_error = Some(ReceiveError::ExceedsAvailableDebt);
        }
    }

    let min_initial_debt = ledger
        .factory_params()
        .map(|params| params.min_initial_debt.value)
        .unwrap_or(0);
    if selected.is_some()
        && min_initial_debt > 0
        && value_to_receive.map_or(true, |value| value < min_initial_debt)
    {
        to_receive_error = Some(ReceiveError::BelowMinimum);
    }

    if let Some(metrics) = selected_metrics {
        if !ledger.purses_connected() {
            to_lock_error = Some(LockError::NoBalanceSource);
        } else {
            let needed = value_to_lock.unwrap_or(0);
            let covered = ledger
                .purse_balance(&metrics.total_collateral.brand)
                .map_or(false, |balance| balance.value >= needed);
            if !covered {
                to_lock_error = Some(LockError::InsufficientFunds);
            }
        }
    }

    Ok(VaultCreationErrors {
        to_lock_error,
        to_receive_error,
        collateralization_ratio_error,
    })
}

/// An adjustment is committable when nothing errors, the vault is active,
/// and at least one axis actually changes.
pub(crate) fn adjustment_ready(
    vault: &VaultToAdjust,
    errors: &AdjustVaultErrors,
    collateral_delta: Option<u64>,
    debt_delta: Option<u64>,
) -> bool {
    let has_delta = collateral_delta.is_some_and(|value| value > 0)
        || debt_delta.is_some_and(|value| value > 0);
    errors.is_empty() && vault.vault_state.is_active() && has_delta
}

/// A creation is committable when nothing errors and the whole
/// lock/receive/ratio triple is solved.
pub(crate) fn creation_ready(create: &CreateState, errors: &VaultCreationErrors) -> bool {
    errors.is_empty()
        && create.selected_collateral_id().is_some()
        && create.value_to_lock().is_some()
        && create.value_to_receive().is_some()
        && create.collateralization_ratio().is_some()
}
