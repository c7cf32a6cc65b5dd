//! Store traits implemented by the persistence layer.
//!
//! The engine only ever talks to storage through these seams, so tests can
//! swap in in-memory implementations and the database crate stays free to
//! change schemas without touching the engine.

use async_trait::async_trait;

use crate::customer::Customer;
use crate::job::Job;
use crate::service::Service;
use crate::tenant::Tenant;
use crate::vehicle::Vehicle;
use crate::{ResourceId, Result};

#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn get_by_id(&self, id: ResourceId) -> Result<Option<Tenant>>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Look up a customer, scoped to the tenant. A customer owned by
    /// another tenant is indistinguishable from a missing one.
    async fn get_for_tenant(
        &self,
        tenant_id: ResourceId,
        id: ResourceId,
    ) -> Result<Option<Customer>>;
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn get_for_tenant(
        &self,
        tenant_id: ResourceId,
        id: ResourceId,
    ) -> Result<Option<Vehicle>>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// Resolve ids to active services owned by the tenant. Inactive,
    /// foreign or unknown ids are simply absent from the result; callers
    /// compare counts to detect them.
    async fn find_active_by_ids(
        &self,
        tenant_id: ResourceId,
        ids: &[ResourceId],
    ) -> Result<Vec<Service>>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Number of jobs currently occupying one of the tenant's slots.
    async fn count_active(&self, tenant_id: ResourceId) -> Result<u64>;

    /// Whether a token is already taken within the tenant.
    async fn token_exists(&self, tenant_id: ResourceId, token: &str) -> Result<bool>;

    /// Persist a new job. Fails with [`crate::Error::DuplicateToken`] when
    /// the tenant-scoped token constraint is violated; callers regenerate
    /// and retry.
    async fn insert(&self, job: &Job) -> Result<()>;

    /// Load a job scoped to the tenant, optionally further scoped to the
    /// employee it is assigned to.
    async fn find_by_id(
        &self,
        tenant_id: ResourceId,
        job_id: ResourceId,
        assigned_to: Option<ResourceId>,
    ) -> Result<Option<Job>>;

    /// Persist changes to an existing job.
    async fn save(&self, job: &Job) -> Result<()>;
}
