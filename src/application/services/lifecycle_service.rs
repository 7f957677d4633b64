use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::application::ports::{
    Clock, JobRepository, LedgerRepository, RepositoryError, StatusNotifier,
};
use crate::domain::{
    Actor, ActorRole, AddOn, CustomerId, ElectricianId, Job, JobId, JobStatus, TimelineEvent,
};

use super::settlement;

/// The lifecycle controller. Every status change and every ledger entry
/// in the system goes through here; nothing else mutates a job.
///
/// Commits use the repository's version check-and-set inside a bounded
/// retry loop, so two concurrent requests against the same job can never
/// both validate against a stale status.
pub struct LifecycleService {
    jobs: Arc<dyn JobRepository>,
    ledger: Arc<dyn LedgerRepository>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn StatusNotifier>,
    commission_rate: Decimal,
    max_commit_attempts: u32,
}

impl LifecycleService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        ledger: Arc<dyn LedgerRepository>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn StatusNotifier>,
        commission_rate: Decimal,
        max_commit_attempts: u32,
    ) -> Self {
        Self {
            jobs,
            ledger,
            clock,
            notifier,
            commission_rate,
            max_commit_attempts,
        }
    }

    /// Create a job and immediately put it out to broadcast. The timeline
    /// carries both the creation and the broadcast event.
    pub async fn create_job(
        &self,
        customer_id: CustomerId,
        description: String,
        base_price: Decimal,
    ) -> Result<Job, TransitionError> {
        let now = self.clock.now();
        let mut job = Job::new(customer_id, description, base_price, now);
        job.timeline.record(TimelineEvent {
            status: JobStatus::Broadcast,
            at: now,
            actor_role: ActorRole::System,
            actor_id: "system".to_string(),
            note: None,
        });
        job.status = JobStatus::Broadcast;

        self.jobs.insert(&job).await?;

        tracing::info!(
            job_id = %job.id,
            customer_id = %job.customer_id,
            base_price = %job.base_price,
            "Job created and broadcast"
        );
        self.notifier.job_status_changed(job.id, job.status).await;
        Ok(job)
    }

    pub async fn get_job(&self, id: JobId) -> Result<Job, TransitionError> {
        self.load(id).await
    }

    pub async fn list_jobs(&self, status: JobStatus) -> Result<Vec<Job>, TransitionError> {
        Ok(self.jobs.list_by_status(status).await?)
    }

    /// Apply a requested status transition on behalf of `actor`.
    ///
    /// Legality against the transition table is checked before
    /// authorization; both are re-checked from a fresh read on every
    /// retry, so a competing commit cannot smuggle a transition past a
    /// stale validation.
    pub async fn apply_transition(
        &self,
        job_id: JobId,
        requested: JobStatus,
        actor: Actor,
        note: Option<String>,
    ) -> Result<Job, TransitionError> {
        for attempt in 1..=self.max_commit_attempts {
            let job = self.load(job_id).await?;
            check_transition(&job, requested, &actor)?;

            let now = self.clock.now();
            let mut updated = job;
            updated.timeline.record(TimelineEvent {
                status: requested,
                at: now,
                actor_role: actor.role,
                actor_id: actor.id.clone(),
                note: note.clone(),
            });
            updated.status = requested;

            let committed = match requested {
                JobStatus::Completed => {
                    updated.completed_at = Some(now);
                    self.commit_completion(&updated, now).await
                }
                JobStatus::Cancelled => {
                    updated.cancelled_at = Some(now);
                    self.jobs.update(&updated).await
                }
                _ => self.jobs.update(&updated).await,
            };

            match committed {
                Ok(job) => {
                    tracing::info!(
                        job_id = %job.id,
                        status = %job.status,
                        actor_role = %actor.role,
                        "Transition committed"
                    );
                    self.notifier.job_status_changed(job.id, job.status).await;
                    return Ok(job);
                }
                Err(RepositoryError::VersionConflict(_)) => {
                    tracing::debug!(job_id = %job_id, attempt, "Stale read, retrying transition");
                    continue;
                }
                Err(e) if requested == JobStatus::Completed => {
                    return Err(TransitionError::Settlement(e));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TransitionError::Conflict {
            attempts: self.max_commit_attempts,
        })
    }

    /// The `Broadcast -> Accepted` transition. Kept out of
    /// `apply_transition` because it also binds the electrician; first
    /// accept wins, everyone after gets `InvalidTransition`.
    pub async fn accept_job(
        &self,
        job_id: JobId,
        electrician_id: ElectricianId,
        electrician_name: String,
    ) -> Result<Job, TransitionError> {
        for attempt in 1..=self.max_commit_attempts {
            let job = self.load(job_id).await?;
            if job.status != JobStatus::Broadcast {
                return Err(TransitionError::InvalidTransition {
                    from: job.status,
                    to: JobStatus::Accepted,
                });
            }

            let now = self.clock.now();
            let mut updated = job;
            updated.electrician_id = Some(electrician_id.clone());
            updated.electrician_name = Some(electrician_name.clone());
            updated.accepted_at = Some(now);
            updated.status = JobStatus::Accepted;
            updated.timeline.record(TimelineEvent {
                status: JobStatus::Accepted,
                at: now,
                actor_role: ActorRole::Electrician,
                actor_id: electrician_id.as_str().to_string(),
                note: None,
            });

            match self.jobs.update(&updated).await {
                Ok(job) => {
                    tracing::info!(
                        job_id = %job.id,
                        electrician_id = %electrician_id,
                        "Job accepted"
                    );
                    self.notifier.job_status_changed(job.id, job.status).await;
                    return Ok(job);
                }
                Err(RepositoryError::VersionConflict(_)) => {
                    tracing::debug!(job_id = %job_id, attempt, "Stale read, retrying accept");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TransitionError::Conflict {
            attempts: self.max_commit_attempts,
        })
    }

    /// Record a customer-approved add-on on a live job. The total price
    /// follows automatically since it is derived from the components.
    pub async fn approve_add_on(
        &self,
        job_id: JobId,
        name: String,
        price: Decimal,
        actor: Actor,
    ) -> Result<Job, TransitionError> {
        for attempt in 1..=self.max_commit_attempts {
            let job = self.load(job_id).await?;
            if !job.status.accepts_add_ons() {
                return Err(TransitionError::AddOnRejected { status: job.status });
            }
            let permitted = actor.role == ActorRole::Admin
                || (actor.role == ActorRole::Customer && job.is_customer(&actor.id));
            if !permitted {
                return Err(TransitionError::Unauthorized { role: actor.role });
            }

            let mut updated = job;
            updated.add_ons.push(AddOn::new(name.clone(), price));

            match self.jobs.update(&updated).await {
                Ok(job) => {
                    tracing::info!(
                        job_id = %job.id,
                        add_on = %name,
                        price = %price,
                        total_price = %job.total_price(),
                        "Add-on approved"
                    );
                    return Ok(job);
                }
                Err(RepositoryError::VersionConflict(_)) => {
                    tracing::debug!(job_id = %job_id, attempt, "Stale read, retrying add-on");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TransitionError::Conflict {
            attempts: self.max_commit_attempts,
        })
    }

    pub async fn cancel(
        &self,
        job_id: JobId,
        actor: Actor,
        note: Option<String>,
    ) -> Result<Job, TransitionError> {
        self.apply_transition(job_id, JobStatus::Cancelled, actor, note)
            .await
    }

    async fn load(&self, id: JobId) -> Result<Job, TransitionError> {
        self.jobs
            .get(id)
            .await?
            .ok_or(TransitionError::NotFound { job_id: id })
    }

    /// Persist a completion: the job update and the two settlement
    /// entries must land as one unit. Settlement runs at most once per
    /// job; a re-entrant completion finds the existing entries and
    /// creates nothing new.
    async fn commit_completion(
        &self,
        updated: &Job,
        now: DateTime<Utc>,
    ) -> Result<Job, RepositoryError> {
        let Some(electrician_id) = updated.electrician_id.clone() else {
            tracing::warn!(
                job_id = %updated.id,
                "Completing job with no electrician bound, nothing to settle"
            );
            return self.jobs.update(updated).await;
        };

        let existing = self.ledger.list_for_job(updated.id).await?;
        if settlement::already_settled(&existing) {
            tracing::warn!(
                job_id = %updated.id,
                "Settlement already recorded for this job, skipping"
            );
            return self.jobs.update(updated).await;
        }

        let split = settlement::split(updated.total_price(), self.commission_rate);
        let entries = settlement::entries_for(updated, &electrician_id, split, now);
        tracing::info!(
            job_id = %updated.id,
            electrician_id = %electrician_id,
            total = %updated.total_price(),
            earning = %split.earning,
            commission = %split.commission,
            "Settling completed job"
        );
        self.jobs.update_with_ledger(updated, &entries).await
    }
}

/// Validate one requested transition: terminal guard, then table
/// legality, then actor authorization. The terminal guard comes first and
/// applies to admins too; the admin override only widens the table for
/// non-terminal sources.
fn check_transition(job: &Job, requested: JobStatus, actor: &Actor) -> Result<(), TransitionError> {
    let from = job.status;
    if from.is_terminal() || requested == from {
        return Err(TransitionError::InvalidTransition {
            from,
            to: requested,
        });
    }

    if actor.role == ActorRole::Admin {
        return Ok(());
    }

    if requested == JobStatus::Cancelled {
        let permitted = match actor.role {
            ActorRole::Customer => job.is_customer(&actor.id),
            ActorRole::Electrician => job.is_assigned_electrician(&actor.id),
            _ => false,
        };
        return if permitted {
            Ok(())
        } else {
            Err(TransitionError::Unauthorized { role: actor.role })
        };
    }

    if from.next_in_line() != Some(requested) {
        return Err(TransitionError::InvalidTransition {
            from,
            to: requested,
        });
    }

    if actor.role == ActorRole::Electrician && job.is_assigned_electrician(&actor.id) {
        Ok(())
    } else {
        Err(TransitionError::Unauthorized { role: actor.role })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
    #[error("{role} is not permitted to request this transition")]
    Unauthorized { role: ActorRole },
    #[error("job not found: {job_id}")]
    NotFound { job_id: JobId },
    #[error("settlement was not committed: {0}")]
    Settlement(RepositoryError),
    #[error("conflicting concurrent updates persisted after {attempts} attempts")]
    Conflict { attempts: u32 },
    #[error("add-ons are frozen once a job is {status}")]
    AddOnRejected { status: JobStatus },
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
