use async_trait::async_trait;

use crate::application::ports::StatusNotifier;
use crate::domain::{JobId, JobStatus};

/// Default outbound hook: writes committed status changes to the service
/// log. A push or webhook channel replaces it behind the same port.
pub struct LogNotifier;

#[async_trait]
impl StatusNotifier for LogNotifier {
    async fn job_status_changed(&self, job_id: JobId, status: JobStatus) {
        tracing::info!(job_id = %job_id, status = %status, "Job status changed");
    }
}
