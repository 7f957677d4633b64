use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::application::ports::{Clock, JobRepository, RepositoryError};
use crate::domain::{ElectricianId, Job, JobId, JobStatus};

use super::{LifecycleService, TransitionError};

/// Broadcast matching: offers unclaimed broadcast jobs to available
/// electricians, one active offer per worker, first accept wins.
///
/// The sessions live in process and are intentionally not a multi-worker
/// queue; the race arbiter is the lifecycle controller's status guard,
/// which rejects every accept after the first. Expiry is observed lazily
/// on the next poll or accept, there is no background timer.
pub struct DispatchService {
    jobs: Arc<dyn JobRepository>,
    lifecycle: Arc<LifecycleService>,
    clock: Arc<dyn Clock>,
    offer_ttl: Duration,
    sessions: RwLock<HashMap<ElectricianId, WorkerSession>>,
}

struct WorkerSession {
    name: String,
    offer: Option<ActiveOffer>,
}

/// A job bound into one worker's offer slot, with its countdown deadline.
#[derive(Debug, Clone)]
pub struct ActiveOffer {
    pub job_id: JobId,
    pub offered_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// What the worker's client renders while the countdown runs.
#[derive(Debug, Clone)]
pub struct OfferView {
    pub job_id: JobId,
    pub description: String,
    pub total_price: Decimal,
    pub offered_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub seconds_remaining: i64,
}

impl OfferView {
    fn from_parts(job: &Job, offer: &ActiveOffer, now: DateTime<Utc>) -> Self {
        Self {
            job_id: offer.job_id,
            description: job.description.clone(),
            total_price: job.total_price(),
            offered_at: offer.offered_at,
            expires_at: offer.expires_at,
            seconds_remaining: (offer.expires_at - now).num_seconds().max(0),
        }
    }
}

impl DispatchService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        lifecycle: Arc<LifecycleService>,
        clock: Arc<dyn Clock>,
        offer_ttl: Duration,
    ) -> Self {
        Self {
            jobs,
            lifecycle,
            clock,
            offer_ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register the worker as available and look for a job to offer.
    /// Re-announcing while an offer is live hands the same offer back.
    pub async fn go_available(
        &self,
        electrician_id: ElectricianId,
        name: String,
    ) -> Result<Option<OfferView>, DispatchError> {
        let mut sessions = self.sessions.write().await;
        let now = self.clock.now();

        let session = sessions
            .entry(electrician_id.clone())
            .or_insert_with(|| WorkerSession {
                name: name.clone(),
                offer: None,
            });
        session.name = name;
        let existing = session.offer.clone();

        if let Some(offer) = existing {
            if offer.expires_at > now {
                if let Some(job) = self.jobs.get(offer.job_id).await? {
                    if job.status == JobStatus::Broadcast {
                        return Ok(Some(OfferView::from_parts(&job, &offer, now)));
                    }
                }
            }
            clear_slot(&mut sessions, &electrician_id);
            tracing::debug!(electrician_id = %electrician_id, "Dropped stale offer on re-announce");
        }

        self.scan_and_bind(&mut sessions, &electrician_id, now).await
    }

    /// Poll the active offer. An elapsed countdown clears the slot
    /// without touching the job; an idle available session triggers a
    /// fresh scan, so polling drives the offer cycle.
    pub async fn current_offer(
        &self,
        electrician_id: &ElectricianId,
    ) -> Result<Option<OfferView>, DispatchError> {
        let mut sessions = self.sessions.write().await;
        let now = self.clock.now();

        if !sessions.contains_key(electrician_id) {
            return Err(DispatchError::NotAvailable);
        }
        let existing = sessions
            .get(electrician_id)
            .and_then(|session| session.offer.clone());

        if let Some(offer) = existing {
            if offer.expires_at > now {
                if let Some(job) = self.jobs.get(offer.job_id).await? {
                    if job.status == JobStatus::Broadcast {
                        return Ok(Some(OfferView::from_parts(&job, &offer, now)));
                    }
                }
                tracing::debug!(
                    job_id = %offer.job_id,
                    electrician_id = %electrician_id,
                    "Offered job is no longer in broadcast, clearing slot"
                );
            } else {
                tracing::info!(
                    job_id = %offer.job_id,
                    electrician_id = %electrician_id,
                    "Offer countdown expired, slot cleared"
                );
            }
            clear_slot(&mut sessions, electrician_id);
        }

        self.scan_and_bind(&mut sessions, electrician_id, now).await
    }

    /// Accept the active offer before its deadline. A lost race surfaces
    /// as `InvalidTransition` from the lifecycle controller and clears
    /// the local slot so the client can reconcile.
    pub async fn accept_offer(
        &self,
        electrician_id: &ElectricianId,
    ) -> Result<Job, DispatchError> {
        let mut sessions = self.sessions.write().await;
        let now = self.clock.now();

        let Some(session) = sessions.get(electrician_id) else {
            return Err(DispatchError::NotAvailable);
        };
        let name = session.name.clone();
        let Some(offer) = session.offer.clone() else {
            return Err(DispatchError::NoActiveOffer);
        };

        if offer.expires_at <= now {
            clear_slot(&mut sessions, electrician_id);
            tracing::info!(
                job_id = %offer.job_id,
                electrician_id = %electrician_id,
                "Accept arrived after the countdown, offer withdrawn"
            );
            return Err(DispatchError::OfferExpired);
        }

        match self
            .lifecycle
            .accept_job(offer.job_id, electrician_id.clone(), name)
            .await
        {
            Ok(job) => {
                clear_slot(&mut sessions, electrician_id);
                Ok(job)
            }
            Err(e @ TransitionError::InvalidTransition { .. }) => {
                clear_slot(&mut sessions, electrician_id);
                tracing::info!(
                    job_id = %offer.job_id,
                    electrician_id = %electrician_id,
                    "Another worker won the job, slot cleared"
                );
                Err(DispatchError::Lifecycle(e))
            }
            Err(e) => Err(DispatchError::Lifecycle(e)),
        }
    }

    /// Decline the active offer. Nothing is written to the job: it stays
    /// in broadcast for the next offer cycle and the decline is visible
    /// only in the logs.
    pub async fn decline_offer(&self, electrician_id: &ElectricianId) -> Result<(), DispatchError> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(electrician_id) else {
            return Err(DispatchError::NotAvailable);
        };
        let Some(offer) = session.offer.take() else {
            return Err(DispatchError::NoActiveOffer);
        };
        tracing::info!(
            job_id = %offer.job_id,
            electrician_id = %electrician_id,
            "Offer declined, slot cleared"
        );
        Ok(())
    }

    /// Drop the worker's session. A live offer is abandoned; the job is
    /// untouched and becomes offerable to someone else.
    pub async fn go_offline(&self, electrician_id: &ElectricianId) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.remove(electrician_id) {
            match session.offer {
                Some(offer) => tracing::info!(
                    job_id = %offer.job_id,
                    electrician_id = %electrician_id,
                    "Worker went offline holding an offer, job stays in broadcast"
                ),
                None => tracing::debug!(electrician_id = %electrician_id, "Worker went offline"),
            }
        }
    }

    /// Find an unclaimed broadcast job not currently offered to another
    /// worker, and bind it into this worker's slot.
    async fn scan_and_bind(
        &self,
        sessions: &mut HashMap<ElectricianId, WorkerSession>,
        electrician_id: &ElectricianId,
        now: DateTime<Utc>,
    ) -> Result<Option<OfferView>, DispatchError> {
        let broadcast = self.jobs.list_by_status(JobStatus::Broadcast).await?;
        let held_elsewhere: HashSet<JobId> = sessions
            .iter()
            .filter(|(id, _)| *id != electrician_id)
            .filter_map(|(_, session)| session.offer.as_ref())
            .filter(|offer| offer.expires_at > now)
            .map(|offer| offer.job_id)
            .collect();

        let Some(job) = broadcast
            .into_iter()
            .find(|job| job.electrician_id.is_none() && !held_elsewhere.contains(&job.id))
        else {
            return Ok(None);
        };

        let offer = ActiveOffer {
            job_id: job.id,
            offered_at: now,
            expires_at: now + self.offer_ttl,
        };
        let view = OfferView::from_parts(&job, &offer, now);
        if let Some(session) = sessions.get_mut(electrician_id) {
            session.offer = Some(offer);
        }
        tracing::info!(
            job_id = %job.id,
            electrician_id = %electrician_id,
            expires_at = %view.expires_at,
            "Job offered"
        );
        Ok(Some(view))
    }
}

fn clear_slot(sessions: &mut HashMap<ElectricianId, WorkerSession>, id: &ElectricianId) {
    if let Some(session) = sessions.get_mut(id) {
        session.offer = None;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no active offer")]
    NoActiveOffer,
    #[error("offer has expired")]
    OfferExpired,
    #[error("electrician has no availability session")]
    NotAvailable,
    #[error("lifecycle: {0}")]
    Lifecycle(#[from] TransitionError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
