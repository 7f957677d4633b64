mod memory;
mod pg_job_repository;
mod pg_ledger_repository;
mod pg_pool;

pub use memory::InMemoryStore;
pub use pg_job_repository::PgJobRepository;
pub use pg_ledger_repository::PgLedgerRepository;
pub use pg_pool::connect_pool;
