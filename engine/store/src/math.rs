//! Vault Delta and Solver Arithmetic
//!
//! Pure functions behind the adjustment model and the creation solver. All
//! rounding is ceiling-biased: fees round up, collateral requirements round
//! up, deliverable debt is never overstated.
//!
//! Projections are total: a repay larger than the outstanding debt or a
//! withdraw larger than the locked collateral projects to zero rather than
//! failing; the validation engine flags the overshoot as data. A delta of
//! zero is treated the same as no delta at all.

use vaultsmith_common::{ceil_divide, ceil_multiply, Amount, MathResult, Ratio};

use crate::adjust::{CollateralAction, DebtAction};

fn effective_delta(delta: Option<&Amount>) -> Option<&Amount> {
    delta.filter(|d| !d.is_zero())
}

/// Debt after applying a delta under `action`.
///
/// Borrowing charges the loan fee on the borrowed increment, rounded up;
/// repaying reduces debt by exactly the delta, saturating at zero.
pub fn debt_after_delta(
    action: DebtAction,
    loan_fee: &Ratio,
    total_debt: &Amount,
    delta: Option<&Amount>,
) -> MathResult<Amount> {
    let Some(delta) = effective_delta(delta) else {
        return Ok(total_debt.clone());
    };

    match action {
        DebtAction::None => Ok(total_debt.clone()),
        DebtAction::Borrow => {
            let fee = ceil_multiply(delta, loan_fee)?;
            total_debt.add(delta)?.add(&fee)
        }
        DebtAction::Repay => {
            if delta.is_gte(total_debt)? {
                Ok(Amount::zero(total_debt.brand.clone()))
            } else {
                total_debt.subtract(delta)
            }
        }
    }
}

/// Locked collateral after applying a delta under `action`, saturating a
/// withdraw at zero.
pub fn locked_after_delta(
    action: CollateralAction,
    locked: &Amount,
    delta: Option<&Amount>,
) -> MathResult<Amount> {
    let Some(delta) = effective_delta(delta) else {
        return Ok(locked.clone());
    };

    match action {
        CollateralAction::None => Ok(locked.clone()),
        CollateralAction::Deposit => locked.add(delta),
        CollateralAction::Withdraw => {
            if delta.is_gte(locked)? {
                Ok(Amount::zero(locked.brand.clone()))
            } else {
                locked.subtract(delta)
            }
        }
    }
}

/// Substitutes the collateral kind's default for a zero target ratio; a
/// zero ratio cannot divide and is separately reported by validation.
fn solver_ratio<'a>(target_ratio: &'a Ratio, default_ratio: &'a Ratio) -> &'a Ratio {
    if target_ratio.numerator_is_zero() {
        default_ratio
    } else {
        target_ratio
    }
}

/// Debt receivable for locking `to_lock_value` of collateral:
/// `ceil(lockedValue / targetRatio)` where
/// `lockedValue = toLock × priceRate`, rounded up at both steps.
pub fn compute_to_receive(
    price_rate: &Ratio,
    target_ratio: &Ratio,
    to_lock_value: u64,
    default_ratio: &Ratio,
) -> MathResult<u64> {
    let ratio = solver_ratio(target_ratio, default_ratio);
    let to_lock = Amount::new(price_rate.denominator.brand.clone(), to_lock_value);
    let locked_value = ceil_multiply(&to_lock, price_rate)?;
    Ok(ceil_divide(&locked_value, ratio)?.value)
}

/// Collateral required to receive `to_receive_value` of debt:
/// `ceil((toReceive × targetRatio) / priceRate)`, rounded up at both steps.
pub fn compute_to_lock(
    price_rate: &Ratio,
    target_ratio: &Ratio,
    to_receive_value: u64,
    default_ratio: &Ratio,
) -> MathResult<u64> {
    let ratio = solver_ratio(target_ratio, default_ratio);
    let to_receive = Amount::new(price_rate.numerator.brand.clone(), to_receive_value);
    let receive_margin = ceil_multiply(&to_receive, ratio)?;
    Ok(ceil_divide(&receive_margin, price_rate)?.value)
}
