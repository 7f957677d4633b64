use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{LedgerRepository, RepositoryError};
use crate::domain::{ElectricianId, JobId, TransactionId, TransactionKind, WalletTransaction};

pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TransactionRow {
    id: Uuid,
    electrician_id: String,
    job_id: Option<Uuid>,
    kind: String,
    amount: Decimal,
    description: String,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> Result<WalletTransaction, RepositoryError> {
        let kind = self
            .kind
            .parse::<TransactionKind>()
            .map_err(RepositoryError::QueryFailed)?;

        Ok(WalletTransaction {
            id: TransactionId::from_uuid(self.id),
            electrician_id: ElectricianId::new(self.electrician_id),
            job_id: self.job_id.map(JobId::from_uuid),
            kind,
            amount: self.amount,
            description: self.description,
            created_at: self.created_at,
        })
    }
}

/// Generic over the executor so the completion path can run it inside the
/// job update's transaction.
pub(super) async fn insert_entry<'e, E>(
    executor: E,
    entry: &WalletTransaction,
) -> Result<(), RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO wallet_transactions (id, electrician_id, job_id, kind, amount, description, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(entry.id.as_uuid())
    .bind(entry.electrician_id.as_str())
    .bind(entry.job_id.map(|id| id.as_uuid()))
    .bind(entry.kind.as_str())
    .bind(entry.amount)
    .bind(entry.description.as_str())
    .bind(entry.created_at)
    .execute(executor)
    .await
    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

    Ok(())
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    #[instrument(skip(self, entry), fields(electrician_id = %entry.electrician_id, kind = %entry.kind))]
    async fn append(&self, entry: &WalletTransaction) -> Result<(), RepositoryError> {
        insert_entry(&self.pool, entry).await
    }

    #[instrument(skip(self), fields(electrician_id = %electrician_id))]
    async fn list_for_electrician(
        &self,
        electrician_id: &ElectricianId,
    ) -> Result<Vec<WalletTransaction>, RepositoryError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, electrician_id, job_id, kind, amount, description, created_at
            FROM wallet_transactions
            WHERE electrician_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(electrician_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }

    #[instrument(skip(self), fields(job_id = %job_id))]
    async fn list_for_job(&self, job_id: JobId) -> Result<Vec<WalletTransaction>, RepositoryError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, electrician_id, job_id, kind, amount, description, created_at
            FROM wallet_transactions
            WHERE job_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(job_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }
}
