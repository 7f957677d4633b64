#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use voltline::application::ports::{Clock, StatusNotifier};
use voltline::application::services::{DispatchService, LifecycleService};
use voltline::domain::{Actor, CustomerId, ElectricianId, Job, JobId, JobStatus};
use voltline::infrastructure::persistence::InMemoryStore;

pub const TEST_OFFER_TTL_SECS: i64 = 60;
pub const TEST_MAX_ATTEMPTS: u32 = 3;

pub fn test_commission_rate() -> Decimal {
    dec!(0.15)
}

/// Clock pinned to a fixed instant, steppable from the test body.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new() -> Self {
        Self::starting_at(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap())
    }

    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Captures notifications in commit order.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(JobId, JobStatus)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(JobId, JobStatus)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl StatusNotifier for RecordingNotifier {
    async fn job_status_changed(&self, job_id: JobId, status: JobStatus) {
        self.events.lock().unwrap().push((job_id, status));
    }
}

/// Whole marketplace wired over the in-memory store with a pinned clock.
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
    pub notifier: Arc<RecordingNotifier>,
    pub lifecycle: Arc<LifecycleService>,
    pub dispatch: Arc<DispatchService>,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let lifecycle = Arc::new(LifecycleService::new(
            store.clone(),
            store.clone(),
            clock.clone(),
            notifier.clone(),
            test_commission_rate(),
            TEST_MAX_ATTEMPTS,
        ));

        let dispatch = Arc::new(DispatchService::new(
            store.clone(),
            lifecycle.clone(),
            clock.clone(),
            Duration::seconds(TEST_OFFER_TTL_SECS),
        ));

        Self {
            store,
            clock,
            notifier,
            lifecycle,
            dispatch,
        }
    }

    pub async fn broadcast_job(&self, customer_id: &str, base_price: Decimal) -> Job {
        self.lifecycle
            .create_job(
                CustomerId::new(customer_id),
                "Replace breaker panel".to_string(),
                base_price,
            )
            .await
            .unwrap()
    }

    pub async fn accepted_job(
        &self,
        customer_id: &str,
        electrician_id: &str,
        base_price: Decimal,
    ) -> Job {
        let job = self.broadcast_job(customer_id, base_price).await;
        self.lifecycle
            .accept_job(
                job.id,
                ElectricianId::new(electrician_id),
                "Sam Voltsen".to_string(),
            )
            .await
            .unwrap()
    }

    /// Walk the linear path as the assigned electrician until `target`.
    pub async fn advance_to(&self, job_id: JobId, electrician_id: &str, target: JobStatus) -> Job {
        let mut job = self.lifecycle.get_job(job_id).await.unwrap();
        while job.status != target {
            let next = job
                .status
                .next_in_line()
                .expect("no linear path to target status");
            job = self
                .lifecycle
                .apply_transition(job_id, next, Actor::electrician(electrician_id), None)
                .await
                .unwrap();
        }
        job
    }
}
