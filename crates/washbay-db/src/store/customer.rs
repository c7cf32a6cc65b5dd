//! Customer store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use washbay_core::customer::Customer;
use washbay_core::store::CustomerStore;
use washbay_core::{ResourceId, Result};

use crate::DbResult;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: uuid::Uuid,
    tenant_id: uuid::Uuid,
    name: String,
    phone: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id.into(),
            tenant_id: row.tenant_id.into(),
            name: row.name,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL implementation of [`CustomerStore`].
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, tenant_id: ResourceId, id: ResourceId) -> DbResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT * FROM customers WHERE id = $1 AND tenant_id = $2",
        )
        .bind(id.as_uuid())
        .bind(tenant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Customer::from))
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn get_for_tenant(
        &self,
        tenant_id: ResourceId,
        id: ResourceId,
    ) -> Result<Option<Customer>> {
        Ok(self.fetch(tenant_id, id).await?)
    }
}
