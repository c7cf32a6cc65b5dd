//! Job store.
//!
//! Jobs carry their sub-documents (service snapshots, status history,
//! image lists) as JSONB columns; the columns the engine filters on
//! (status, token, assignment) are plain columns with indexes. The
//! `(tenant_id, token_number)` unique constraint is the one place token
//! races are actually decided.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use washbay_core::job::{Job, JobStatus, StatusEntry};
use washbay_core::service::ServiceSnapshot;
use washbay_core::store::JobStore;
use washbay_core::{ResourceId, Result};

use crate::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: uuid::Uuid,
    tenant_id: uuid::Uuid,
    customer_id: uuid::Uuid,
    vehicle_id: uuid::Uuid,
    token_number: String,
    status: String,
    services: Json<Vec<ServiceSnapshot>>,
    total_price: Decimal,
    estimated_delivery: Option<DateTime<Utc>>,
    actual_delivery: Option<DateTime<Utc>>,
    status_history: Json<Vec<StatusEntry>>,
    before_images: Json<Vec<String>>,
    after_images: Json<Vec<String>>,
    assigned_to: Option<uuid::Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobRow {
    fn into_job(self) -> DbResult<Job> {
        let status = JobStatus::from_label(&self.status).ok_or_else(|| {
            DbError::Decode(format!("unknown status {:?} on job {}", self.status, self.id))
        })?;
        Ok(Job {
            id: self.id.into(),
            tenant_id: self.tenant_id.into(),
            customer_id: self.customer_id.into(),
            vehicle_id: self.vehicle_id.into(),
            token_number: self.token_number,
            status,
            services: self.services.0,
            total_price: self.total_price,
            estimated_delivery: self.estimated_delivery,
            actual_delivery: self.actual_delivery,
            status_history: self.status_history.0,
            before_images: self.before_images.0,
            after_images: self.after_images.0,
            assigned_to: self.assigned_to.map(Into::into),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// PostgreSQL implementation of [`JobStore`].
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn do_count_active(&self, tenant_id: ResourceId) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM jobs WHERE tenant_id = $1 AND status IN ('RECEIVED', 'WORK_STARTED')",
        )
        .bind(tenant_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;
        Ok(count as u64)
    }

    async fn do_token_exists(&self, tenant_id: ResourceId, token: &str) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM jobs WHERE tenant_id = $1 AND token_number = $2)",
        )
        .bind(tenant_id.as_uuid())
        .bind(token)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn do_insert(&self, job: &Job) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO jobs (
                id, tenant_id, customer_id, vehicle_id, token_number, status,
                services, total_price, estimated_delivery, actual_delivery,
                status_history, before_images, after_images, assigned_to,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.tenant_id.as_uuid())
        .bind(job.customer_id.as_uuid())
        .bind(job.vehicle_id.as_uuid())
        .bind(&job.token_number)
        .bind(job.status.as_label())
        .bind(Json(&job.services))
        .bind(job.total_price)
        .bind(job.estimated_delivery)
        .bind(job.actual_delivery)
        .bind(Json(&job.status_history))
        .bind(Json(&job.before_images))
        .bind(Json(&job.after_images))
        .bind(job.assigned_to.map(|id| *id.as_uuid()))
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(DbError::Duplicate(format!(
                    "token {} already exists for tenant {}",
                    job.token_number, job.tenant_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn do_find_by_id(
        &self,
        tenant_id: ResourceId,
        job_id: ResourceId,
        assigned_to: Option<ResourceId>,
    ) -> DbResult<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE id = $1 AND tenant_id = $2
              AND ($3::uuid IS NULL OR assigned_to = $3)
            "#,
        )
        .bind(job_id.as_uuid())
        .bind(tenant_id.as_uuid())
        .bind(assigned_to.map(|id| *id.as_uuid()))
        .fetch_optional(&self.pool)
        .await?;
        row.map(JobRow::into_job).transpose()
    }

    async fn do_save(&self, job: &Job) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE jobs SET
                status = $2,
                actual_delivery = $3,
                status_history = $4,
                before_images = $5,
                after_images = $6,
                assigned_to = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.status.as_label())
        .bind(job.actual_delivery)
        .bind(Json(&job.status_history))
        .bind(Json(&job.before_images))
        .bind(Json(&job.after_images))
        .bind(job.assigned_to.map(|id| *id.as_uuid()))
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("job {}", job.id)));
        }
        Ok(())
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn count_active(&self, tenant_id: ResourceId) -> Result<u64> {
        Ok(self.do_count_active(tenant_id).await?)
    }

    async fn token_exists(&self, tenant_id: ResourceId, token: &str) -> Result<bool> {
        Ok(self.do_token_exists(tenant_id, token).await?)
    }

    async fn insert(&self, job: &Job) -> Result<()> {
        Ok(self.do_insert(job).await?)
    }

    async fn find_by_id(
        &self,
        tenant_id: ResourceId,
        job_id: ResourceId,
        assigned_to: Option<ResourceId>,
    ) -> Result<Option<Job>> {
        Ok(self.do_find_by_id(tenant_id, job_id, assigned_to).await?)
    }

    async fn save(&self, job: &Job) -> Result<()> {
        Ok(self.do_save(job).await?)
    }
}
