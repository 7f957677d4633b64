use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{ElectricianId, Job, TransactionKind, WalletTransaction};

/// Default platform commission rate (15%).
pub fn default_commission_rate() -> Decimal {
    Decimal::new(15, 2)
}

/// The two legs of a settlement, rounded independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementSplit {
    pub earning: Decimal,
    pub commission: Decimal,
}

/// Split a total price into the electrician's earning and the platform
/// commission at `rate`, each rounded half-up to 2 decimal places.
///
/// The legs are rounded independently; their sum may drift from the
/// total by a cent.
pub fn split(total: Decimal, rate: Decimal) -> SettlementSplit {
    let earning = (total * (Decimal::ONE - rate))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let commission =
        (total * rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    SettlementSplit {
        earning,
        commission,
    }
}

/// Materialize the settlement of a completed job as one earning and one
/// commission entry for the assigned electrician, both tagged with the
/// job id.
pub fn entries_for(
    job: &Job,
    electrician_id: &ElectricianId,
    split: SettlementSplit,
    now: DateTime<Utc>,
) -> [WalletTransaction; 2] {
    [
        WalletTransaction::new(
            electrician_id.clone(),
            Some(job.id),
            TransactionKind::Earning,
            split.earning,
            format!("Earnings for job {}", job.id),
            now,
        ),
        WalletTransaction::new(
            electrician_id.clone(),
            Some(job.id),
            TransactionKind::Commission,
            split.commission,
            format!("Platform commission for job {}", job.id),
            now,
        ),
    ]
}

/// Whether settlement already ran for this job. Guards against
/// re-entrant completion creating duplicate ledger entries.
pub fn already_settled(existing: &[WalletTransaction]) -> bool {
    existing.iter().any(|e| {
        matches!(
            e.kind,
            TransactionKind::Earning | TransactionKind::Commission | TransactionKind::Settlement
        )
    })
}
