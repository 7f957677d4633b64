use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a job. The closed set keeps transition checks
/// exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Just created, not yet visible to electricians.
    Created,
    /// Visible to available electricians, nobody bound yet.
    Broadcast,
    /// An electrician accepted and is bound to the job.
    Accepted,
    EnRoute,
    Arrived,
    InProgress,
    /// Work done and settlement recorded. Terminal.
    Completed,
    /// Reconciled out-of-band by an operator. Terminal.
    Settled,
    /// Abandoned by either party. Terminal.
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Created => "CREATED",
            JobStatus::Broadcast => "BROADCAST",
            JobStatus::Accepted => "ACCEPTED",
            JobStatus::EnRoute => "EN_ROUTE",
            JobStatus::Arrived => "ARRIVED",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Settled => "SETTLED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }

    /// The single permitted next status on the linear happy path.
    /// `Broadcast -> Accepted` is not part of this table: acceptance also
    /// binds an electrician and goes through the dispatch flow.
    pub fn next_in_line(self) -> Option<JobStatus> {
        match self {
            JobStatus::Accepted => Some(JobStatus::EnRoute),
            JobStatus::EnRoute => Some(JobStatus::Arrived),
            JobStatus::Arrived => Some(JobStatus::InProgress),
            JobStatus::InProgress => Some(JobStatus::Completed),
            _ => None,
        }
    }

    /// Terminal statuses have no outgoing transitions for any actor.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Settled | JobStatus::Cancelled
        )
    }

    /// Cancellation is a side channel open from every non-terminal status.
    pub fn can_cancel(self) -> bool {
        !self.is_terminal()
    }

    /// Statuses in which the job is live and approved add-ons may still
    /// change the price.
    pub fn accepts_add_ons(self) -> bool {
        matches!(
            self,
            JobStatus::Accepted | JobStatus::EnRoute | JobStatus::Arrived | JobStatus::InProgress
        )
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(JobStatus::Created),
            "BROADCAST" => Ok(JobStatus::Broadcast),
            "ACCEPTED" => Ok(JobStatus::Accepted),
            "EN_ROUTE" => Ok(JobStatus::EnRoute),
            "ARRIVED" => Ok(JobStatus::Arrived),
            "IN_PROGRESS" => Ok(JobStatus::InProgress),
            "COMPLETED" => Ok(JobStatus::Completed),
            "SETTLED" => Ok(JobStatus::Settled),
            "CANCELLED" => Ok(JobStatus::Cancelled),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
