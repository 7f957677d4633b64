use crate::domain::{ElectricianId, JobId, WalletTransaction};
use async_trait::async_trait;

use super::RepositoryError;

/// Storage contract for the wallet ledger. Entries are append-only;
/// there is no update or delete.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn append(&self, entry: &WalletTransaction) -> Result<(), RepositoryError>;

    /// All entries for one electrician, newest first.
    async fn list_for_electrician(
        &self,
        electrician_id: &ElectricianId,
    ) -> Result<Vec<WalletTransaction>, RepositoryError>;

    /// All entries tagged with one job, in creation order.
    async fn list_for_job(&self, job_id: JobId) -> Result<Vec<WalletTransaction>, RepositoryError>;
}
