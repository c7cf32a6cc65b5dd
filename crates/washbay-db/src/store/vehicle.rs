//! Vehicle store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use washbay_core::store::VehicleStore;
use washbay_core::vehicle::Vehicle;
use washbay_core::{ResourceId, Result};

use crate::DbResult;

#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: uuid::Uuid,
    tenant_id: uuid::Uuid,
    customer_id: uuid::Uuid,
    plate: String,
    model: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Vehicle {
            id: row.id.into(),
            tenant_id: row.tenant_id.into(),
            customer_id: row.customer_id.into(),
            plate: row.plate,
            model: row.model,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL implementation of [`VehicleStore`].
pub struct PgVehicleStore {
    pool: PgPool,
}

impl PgVehicleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, tenant_id: ResourceId, id: ResourceId) -> DbResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>(
            "SELECT * FROM vehicles WHERE id = $1 AND tenant_id = $2",
        )
        .bind(id.as_uuid())
        .bind(tenant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Vehicle::from))
    }
}

#[async_trait]
impl VehicleStore for PgVehicleStore {
    async fn get_for_tenant(
        &self,
        tenant_id: ResourceId,
        id: ResourceId,
    ) -> Result<Option<Vehicle>> {
        Ok(self.fetch(tenant_id, id).await?)
    }
}
