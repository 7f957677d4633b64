mod actor;
mod add_on;
mod ids;
mod job;
mod job_status;
mod timeline;
mod transaction;

pub use actor::{Actor, ActorRole};
pub use add_on::AddOn;
pub use ids::{CustomerId, ElectricianId, JobId, TransactionId};
pub use job::Job;
pub use job_status::JobStatus;
pub use timeline::{Timeline, TimelineEvent};
pub use transaction::{TransactionKind, WalletTransaction, balance_of};
