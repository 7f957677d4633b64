use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{
    AddOn, CustomerId, ElectricianId, Job, JobId, JobStatus, Timeline, WalletTransaction,
};

use super::pg_ledger_repository::insert_entry;

/// Queries use the plain-string API rather than the checked macros so the
/// crate builds without a live database; the row structs below keep the
/// column mapping in one place.
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Zero rows hit on a versioned update: either the job is gone or the
    /// version raced. A follow-up read tells the two apart.
    async fn classify_missed_update(&self, job: &Job) -> RepositoryError {
        match sqlx::query_scalar::<_, i64>("SELECT version FROM jobs WHERE id = $1")
            .bind(job.id.as_uuid())
            .fetch_optional(&self.pool)
            .await
        {
            Ok(Some(stored)) => RepositoryError::VersionConflict(format!(
                "job {}: wrote against version {}, stored is {}",
                job.id, job.version, stored
            )),
            Ok(None) => RepositoryError::NotFound(format!("job {}", job.id)),
            Err(e) => RepositoryError::QueryFailed(e.to_string()),
        }
    }
}

#[derive(FromRow)]
struct JobRow {
    id: Uuid,
    customer_id: String,
    electrician_id: Option<String>,
    electrician_name: Option<String>,
    description: String,
    base_price: Decimal,
    add_ons: Json<Vec<AddOn>>,
    status: String,
    timeline: Json<Timeline>,
    created_at: DateTime<Utc>,
    accepted_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    version: i64,
}

impl JobRow {
    fn into_domain(self) -> Result<Job, RepositoryError> {
        let status = self
            .status
            .parse::<JobStatus>()
            .map_err(RepositoryError::QueryFailed)?;

        Ok(Job {
            id: JobId::from_uuid(self.id),
            customer_id: CustomerId::new(self.customer_id),
            electrician_id: self.electrician_id.map(ElectricianId::new),
            electrician_name: self.electrician_name,
            description: self.description,
            base_price: self.base_price,
            add_ons: self.add_ons.0,
            status,
            timeline: self.timeline.0,
            created_at: self.created_at,
            accepted_at: self.accepted_at,
            completed_at: self.completed_at,
            cancelled_at: self.cancelled_at,
            version: self.version as u64,
        })
    }
}

/// The job as it stands after a successful versioned write.
fn committed(job: &Job) -> Job {
    let mut committed = job.clone();
    committed.version = job.version + 1;
    committed
}

/// Versioned update shared by the plain and the ledger-carrying variants.
/// `customer_id`, `description` and `created_at` are immutable after
/// insert and deliberately absent from the SET list.
async fn cas_update<'e, E>(executor: E, job: &Job) -> Result<u64, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE jobs
        SET electrician_id = $1, electrician_name = $2, base_price = $3, add_ons = $4,
            status = $5, timeline = $6, accepted_at = $7, completed_at = $8,
            cancelled_at = $9, version = $10
        WHERE id = $11 AND version = $12
        "#,
    )
    .bind(job.electrician_id.as_ref().map(|id| id.as_str()))
    .bind(job.electrician_name.as_deref())
    .bind(job.base_price)
    .bind(Json(&job.add_ons))
    .bind(job.status.as_str())
    .bind(Json(&job.timeline))
    .bind(job.accepted_at)
    .bind(job.completed_at)
    .bind(job.cancelled_at)
    .bind(job.version as i64 + 1)
    .bind(job.id.as_uuid())
    .bind(job.version as i64)
    .execute(executor)
    .await
    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

    Ok(result.rows_affected())
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn insert(&self, job: &Job) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, customer_id, electrician_id, electrician_name, description,
                              base_price, add_ons, status, timeline, created_at,
                              accepted_at, completed_at, cancelled_at, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.customer_id.as_str())
        .bind(job.electrician_id.as_ref().map(|id| id.as_str()))
        .bind(job.electrician_name.as_deref())
        .bind(job.description.as_str())
        .bind(job.base_price)
        .bind(Json(&job.add_ons))
        .bind(job.status.as_str())
        .bind(Json(&job.timeline))
        .bind(job.created_at)
        .bind(job.accepted_at)
        .bind(job.completed_at)
        .bind(job.cancelled_at)
        .bind(job.version as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, customer_id, electrician_id, electrician_name, description,
                   base_price, add_ons, status, timeline, created_at,
                   accepted_at, completed_at, cancelled_at, version
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(JobRow::into_domain).transpose()
    }

    #[instrument(skip(self, job), fields(job_id = %job.id, status = %job.status))]
    async fn update(&self, job: &Job) -> Result<Job, RepositoryError> {
        let hit = cas_update(&self.pool, job).await?;
        if hit == 0 {
            return Err(self.classify_missed_update(job).await);
        }

        Ok(committed(job))
    }

    #[instrument(skip(self, job, entries), fields(job_id = %job.id, entries = entries.len()))]
    async fn update_with_ledger(
        &self,
        job: &Job,
        entries: &[WalletTransaction],
    ) -> Result<Job, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        let hit = cas_update(&mut *tx, job).await?;
        if hit == 0 {
            // Dropping the open transaction rolls it back.
            return Err(self.classify_missed_update(job).await);
        }

        for entry in entries {
            insert_entry(&mut *tx, entry).await?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(committed(job))
    }

    #[instrument(skip(self), fields(status = %status))]
    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, customer_id, electrician_id, electrician_name, description,
                   base_price, add_ons, status, timeline, created_at,
                   accepted_at, completed_at, cancelled_at, version
            FROM jobs
            WHERE status = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.into_iter().map(JobRow::into_domain).collect()
    }
}
