use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ActorRole, JobStatus};

/// One status change, as it was accepted by the lifecycle controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub status: JobStatus,
    pub at: DateTime<Utc>,
    pub actor_role: ActorRole,
    pub actor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Append-only history of a job's status changes, in chronological order.
/// Entries are never edited or removed; the last entry defines the
/// current status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline(Vec<TimelineEvent>);

impl Timeline {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn record(&mut self, event: TimelineEvent) {
        self.0.push(event);
    }

    pub fn last(&self) -> Option<&TimelineEvent> {
        self.0.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineEvent;
    type IntoIter = std::slice::Iter<'a, TimelineEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
