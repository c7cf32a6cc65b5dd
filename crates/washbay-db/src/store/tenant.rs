//! Tenant store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use washbay_core::store::TenantStore;
use washbay_core::tenant::{ConcurrencyPolicy, Tenant};
use washbay_core::{ResourceId, Result};

use crate::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct TenantRow {
    id: uuid::Uuid,
    name: String,
    slug: String,
    phone: String,
    concurrency_mode: String,
    max_concurrent_jobs: i32,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self) -> DbResult<Tenant> {
        let concurrency = match self.concurrency_mode.as_str() {
            "SINGLE" => ConcurrencyPolicy::Single,
            "MULTIPLE" => ConcurrencyPolicy::Multiple {
                max_concurrent_jobs: self.max_concurrent_jobs.max(1) as u32,
            },
            other => {
                return Err(DbError::Decode(format!(
                    "unknown concurrency mode {:?} on tenant {}",
                    other, self.id
                )));
            }
        };
        Ok(Tenant {
            id: self.id.into(),
            name: self.name,
            slug: self.slug,
            phone: self.phone,
            concurrency,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// PostgreSQL implementation of [`TenantStore`].
pub struct PgTenantStore {
    pool: PgPool,
}

impl PgTenantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: ResourceId) -> DbResult<Option<Tenant>> {
        let row = sqlx::query_as::<_, TenantRow>("SELECT * FROM tenants WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.map(TenantRow::into_tenant).transpose()
    }
}

#[async_trait]
impl TenantStore for PgTenantStore {
    async fn get_by_id(&self, id: ResourceId) -> Result<Option<Tenant>> {
        Ok(self.fetch(id).await?)
    }
}
