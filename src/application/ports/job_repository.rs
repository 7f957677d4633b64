use crate::domain::{Job, JobId, JobStatus, WalletTransaction};
use async_trait::async_trait;

use super::RepositoryError;

/// Storage contract for jobs.
///
/// `update` and `update_with_ledger` are check-and-set writes keyed on
/// `job.version` (the version the caller read): a stale version yields
/// `VersionConflict` and the committed record carries `version + 1`. This
/// is what keeps transition application atomic per job.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    async fn update(&self, job: &Job) -> Result<Job, RepositoryError>;

    /// Commit a job update together with ledger entries as one unit.
    /// Either everything is persisted or nothing is; used for the
    /// completion transition so a settlement failure cannot leave a
    /// completed job without its transactions (or vice versa).
    async fn update_with_ledger(
        &self,
        job: &Job,
        entries: &[WalletTransaction],
    ) -> Result<Job, RepositoryError>;

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError>;
}
