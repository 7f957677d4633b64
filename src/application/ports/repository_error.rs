/// Failures surfaced by the persistence ports. `VersionConflict` is the
/// only variant callers branch on; it marks a stale check-and-set and
/// nothing else.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("stale write: {0}")]
    VersionConflict(String),
    #[error("database unavailable: {0}")]
    ConnectionFailed(String),
    #[error("storage operation failed: {0}")]
    QueryFailed(String),
    #[error("no such row: {0}")]
    NotFound(String),
}
