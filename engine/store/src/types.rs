//! Ledger-Facing Records
//!
//! Shapes of the data the external ingestion layer writes into the store:
//! vault snapshots, per-manager protocol parameters and metrics, price
//! quotes, and the protocol-wide factory parameters. All of them are
//! read-only to the engine and replaced wholesale on each external update;
//! the engine never partially mutates a ledger record.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use vaultsmith_common::{Amount, MathResult, Ratio};

/// Identifier of a collateral manager, e.g. `"manager0"`
pub type ManagerId = String;

/// Identifier of the wallet offer that created a vault
pub type OfferId = String;

/// Lifecycle state of a vault as reported by the ledger
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub enum VaultState {
    /// Vault is open and can be adjusted
    #[default]
    Active,
    /// Vault is being liquidated
    Liquidating,
    /// Vault was liquidated
    Liquidated,
    /// Vault was closed by its owner
    Closed,
    /// Vault is being transferred to another owner
    Transfer,
}

impl VaultState {
    /// Only active vaults accept adjustments
    pub fn is_active(&self) -> bool {
        *self == VaultState::Active
    }
}

/// A vault's debt as of its last write: the amount plus the manager-wide
/// compounded interest coefficient current at that moment. Scaling the
/// amount by the coefficient's movement since yields the present debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct DebtSnapshot {
    /// Debt amount at snapshot time
    pub debt: Amount,
    /// Compounded interest coefficient at snapshot time
    pub interest: Ratio,
}

/// One vault as reported by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VaultSnapshot {
    /// Collateral locked in the vault
    pub locked: Amount,
    /// Debt with its interest snapshot
    pub debt_snapshot: DebtSnapshot,
    /// Manager this vault belongs to
    pub manager_id: ManagerId,
    /// Offer that created the vault
    pub created_by_offer_id: OfferId,
    /// Position of this vault within its manager
    pub index_within_manager: u64,
    /// Lifecycle state
    pub vault_state: VaultState,
}

/// Manager-wide state the engine reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Manager {
    /// Cumulative interest coefficient, current as of the latest update
    pub compounded_interest: Ratio,
}

/// Governed parameters for one collateral type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ManagerParams {
    /// Collateralization ratio below which a vault may be liquidated
    pub liquidation_margin: Ratio,
    /// Minimum collateralization required of adjustments
    pub inferred_minimum_collateralization: Ratio,
    /// Annual interest rate charged on debt
    pub interest_rate: Ratio,
    /// Fee charged on newly borrowed debt
    pub loan_fee: Ratio,
    /// Protocol-wide cap on this manager's total outstanding debt
    pub debt_limit: Amount,
}

/// Live metrics for one collateral type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ManagerMetrics {
    /// Total debt outstanding across the manager's vaults
    pub total_debt: Amount,
    /// Total collateral locked across the manager's vaults
    pub total_collateral: Amount,
    /// Collateral retained by the protocol from liquidations
    pub retained_collateral: Amount,
}

/// Protocol-wide vault-factory parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct FactoryParams {
    /// Minimum debt a newly created vault must draw
    pub min_initial_debt: Amount,
}

/// A price observation: `amount_in` of collateral trades for `amount_out`
/// of the quote asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PriceQuote {
    /// Collateral side of the quote
    pub amount_in: Amount,
    /// Value side of the quote
    pub amount_out: Amount,
}

impl PriceQuote {
    /// The quote as a collateral → value rate.
    ///
    /// Fails with `ZeroDenominator` on a malformed quote whose input side
    /// is zero.
    pub fn price_rate(&self) -> MathResult<Ratio> {
        Ratio::from_amounts(self.amount_out.clone(), self.amount_in.clone())
    }
}

/// Identifies one vault: its manager plus its index within that manager
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct VaultKey {
    /// Manager the vault belongs to
    pub manager_id: ManagerId,
    /// Position of the vault within its manager
    pub index_within_manager: u64,
}

impl VaultKey {
    /// Builds the key for `index_within_manager` under `manager_id`
    pub fn new(manager_id: impl Into<ManagerId>, index_within_manager: u64) -> Self {
        Self {
            manager_id: manager_id.into(),
            index_within_manager,
        }
    }
}
