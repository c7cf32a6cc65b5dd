//! Service catalog store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use washbay_core::service::Service;
use washbay_core::store::ServiceStore;
use washbay_core::{ResourceId, Result};

use crate::DbResult;

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: uuid::Uuid,
    tenant_id: uuid::Uuid,
    name: String,
    price: Decimal,
    max_minutes: i64,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Service {
            id: row.id.into(),
            tenant_id: row.tenant_id.into(),
            name: row.name,
            price: row.price,
            max_minutes: row.max_minutes,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL implementation of [`ServiceStore`].
pub struct PgServiceStore {
    pool: PgPool,
}

impl PgServiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_active(
        &self,
        tenant_id: ResourceId,
        ids: &[ResourceId],
    ) -> DbResult<Vec<Service>> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query_as::<_, ServiceRow>(
            "SELECT * FROM services WHERE tenant_id = $1 AND active AND id = ANY($2)",
        )
        .bind(tenant_id.as_uuid())
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Service::from).collect())
    }
}

#[async_trait]
impl ServiceStore for PgServiceStore {
    async fn find_active_by_ids(
        &self,
        tenant_id: ResourceId,
        ids: &[ResourceId],
    ) -> Result<Vec<Service>> {
        Ok(self.fetch_active(tenant_id, ids).await?)
    }
}
