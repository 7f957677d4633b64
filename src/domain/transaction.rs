use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ElectricianId, JobId, TransactionId};

/// Kind of wallet ledger entry. The kind implies the sign: amounts are
/// stored as nonnegative magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Earning,
    Commission,
    Settlement,
    Deduction,
    Bonus,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Earning => "earning",
            TransactionKind::Commission => "commission",
            TransactionKind::Settlement => "settlement",
            TransactionKind::Deduction => "deduction",
            TransactionKind::Bonus => "bonus",
        }
    }

    /// Credits increase the electrician's balance, debits decrease it.
    pub fn is_credit(self) -> bool {
        matches!(self, TransactionKind::Earning | TransactionKind::Bonus)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earning" => Ok(TransactionKind::Earning),
            "commission" => Ok(TransactionKind::Commission),
            "settlement" => Ok(TransactionKind::Settlement),
            "deduction" => Ok(TransactionKind::Deduction),
            "bonus" => Ok(TransactionKind::Bonus),
            _ => Err(format!("Invalid transaction kind: {}", s)),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable wallet ledger entry. Balances are derived by folding the
/// ledger, never stored and mutated separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: TransactionId,
    pub electrician_id: ElectricianId,
    pub job_id: Option<JobId>,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl WalletTransaction {
    pub fn new(
        electrician_id: ElectricianId,
        job_id: Option<JobId>,
        kind: TransactionKind,
        amount: Decimal,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            electrician_id,
            job_id,
            kind,
            amount,
            description: description.into(),
            created_at,
        }
    }

    /// Amount with the polarity implied by the kind, for balance folds.
    pub fn signed_amount(&self) -> Decimal {
        if self.kind.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }
}

/// Fold a set of ledger entries into the electrician's balance.
pub fn balance_of(entries: &[WalletTransaction]) -> Decimal {
    entries.iter().map(WalletTransaction::signed_amount).sum()
}
