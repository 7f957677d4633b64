use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{JobRepository, LedgerRepository, RepositoryError};
use crate::domain::{ElectricianId, Job, JobId, JobStatus, WalletTransaction};

/// In-memory backend implementing both repository ports over one guarded
/// state, so a completion lands its job update and ledger entries in a
/// single critical section. The default backend for local runs and the
/// substrate for tests.
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    jobs: HashMap<JobId, Job>,
    ledger: Vec<WalletTransaction>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn commit_job(state: &mut StoreState, job: &Job) -> Result<Job, RepositoryError> {
    let current = state
        .jobs
        .get(&job.id)
        .ok_or_else(|| RepositoryError::NotFound(format!("job {}", job.id)))?;
    if current.version != job.version {
        return Err(RepositoryError::VersionConflict(format!(
            "job {}: wrote against version {}, stored is {}",
            job.id, job.version, current.version
        )));
    }
    let mut committed = job.clone();
    committed.version = job.version + 1;
    state.jobs.insert(job.id, committed.clone());
    Ok(committed)
}

#[async_trait]
impl JobRepository for InMemoryStore {
    async fn insert(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if state.jobs.contains_key(&job.id) {
            return Err(RepositoryError::QueryFailed(format!(
                "duplicate job id: {}",
                job.id
            )));
        }
        state.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.state.read().await.jobs.get(&id).cloned())
    }

    async fn update(&self, job: &Job) -> Result<Job, RepositoryError> {
        let mut state = self.state.write().await;
        commit_job(&mut state, job)
    }

    async fn update_with_ledger(
        &self,
        job: &Job,
        entries: &[WalletTransaction],
    ) -> Result<Job, RepositoryError> {
        let mut state = self.state.write().await;
        let committed = commit_job(&mut state, job)?;
        state.ledger.extend(entries.iter().cloned());
        Ok(committed)
    }

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError> {
        let state = self.state.read().await;
        let mut jobs: Vec<Job> = state
            .jobs
            .values()
            .filter(|job| job.status == status)
            .cloned()
            .collect();
        jobs.sort_by_key(|job| job.created_at);
        Ok(jobs)
    }
}

#[async_trait]
impl LedgerRepository for InMemoryStore {
    async fn append(&self, entry: &WalletTransaction) -> Result<(), RepositoryError> {
        self.state.write().await.ledger.push(entry.clone());
        Ok(())
    }

    async fn list_for_electrician(
        &self,
        electrician_id: &ElectricianId,
    ) -> Result<Vec<WalletTransaction>, RepositoryError> {
        let state = self.state.read().await;
        let mut entries: Vec<WalletTransaction> = state
            .ledger
            .iter()
            .filter(|entry| &entry.electrician_id == electrician_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn list_for_job(
        &self,
        job_id: JobId,
    ) -> Result<Vec<WalletTransaction>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .ledger
            .iter()
            .filter(|entry| entry.job_id == Some(job_id))
            .cloned()
            .collect())
    }
}
