mod clock;
mod job_repository;
mod ledger_repository;
mod notifier;
mod repository_error;

pub use clock::{Clock, SystemClock};
pub use job_repository::JobRepository;
pub use ledger_repository::LedgerRepository;
pub use notifier::{NoopNotifier, StatusNotifier};
pub use repository_error::RepositoryError;
