use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    ActorRole, AddOn, CustomerId, ElectricianId, JobId, JobStatus, Timeline, TimelineEvent,
};

/// One service request, from creation through settlement or cancellation.
///
/// The status always mirrors the last timeline entry; both are only ever
/// changed together, through the lifecycle service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub customer_id: CustomerId,
    pub electrician_id: Option<ElectricianId>,
    pub electrician_name: Option<String>,
    pub description: String,
    pub base_price: Decimal,
    pub add_ons: Vec<AddOn>,
    pub status: JobStatus,
    pub timeline: Timeline,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Optimistic-concurrency token, bumped by the repository on every
    /// committed update.
    pub version: u64,
}

impl Job {
    /// A fresh job in `Created`, with the creation event already on the
    /// timeline.
    pub fn new(
        customer_id: CustomerId,
        description: impl Into<String>,
        base_price: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        let mut timeline = Timeline::new();
        timeline.record(TimelineEvent {
            status: JobStatus::Created,
            at: now,
            actor_role: ActorRole::Customer,
            actor_id: customer_id.as_str().to_string(),
            note: None,
        });

        Self {
            id: JobId::new(),
            customer_id,
            electrician_id: None,
            electrician_name: None,
            description: description.into(),
            base_price,
            add_ons: Vec::new(),
            status: JobStatus::Created,
            timeline,
            created_at: now,
            accepted_at: None,
            completed_at: None,
            cancelled_at: None,
            version: 1,
        }
    }

    /// Total price is always derived from its components, never cached.
    pub fn total_price(&self) -> Decimal {
        self.base_price + self.add_ons.iter().map(|a| a.price).sum::<Decimal>()
    }

    /// Whether `actor_id` is the customer who opened this job.
    pub fn is_customer(&self, actor_id: &str) -> bool {
        self.customer_id.as_str() == actor_id
    }

    /// Whether `actor_id` is the electrician bound to this job.
    pub fn is_assigned_electrician(&self, actor_id: &str) -> bool {
        self.electrician_id
            .as_ref()
            .is_some_and(|id| id.as_str() == actor_id)
    }
}
