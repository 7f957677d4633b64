use async_trait::async_trait;

use crate::domain::{JobId, JobStatus};

/// Outbound hook fired after a transition commits. Implementations must
/// absorb their own failures; a notification can never veto a committed
/// transition.
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    async fn job_status_changed(&self, job_id: JobId, status: JobStatus);
}

pub struct NoopNotifier;

#[async_trait]
impl StatusNotifier for NoopNotifier {
    async fn job_status_changed(&self, _job_id: JobId, _status: JobStatus) {}
}
