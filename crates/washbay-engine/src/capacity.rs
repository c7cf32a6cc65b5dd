//! Capacity admission control.

use std::sync::Arc;

use washbay_core::store::{JobStore, TenantStore};
use washbay_core::tenant::ConcurrencyPolicy;
use washbay_core::{Error, ResourceId, Result};

/// Outcome of a capacity check.
#[derive(Debug, Clone)]
pub struct CapacityDecision {
    pub can_accept: bool,
    /// Human-readable refusal reason when `can_accept` is false.
    pub reason: Option<String>,
}

impl CapacityDecision {
    fn accept() -> Self {
        Self {
            can_accept: true,
            reason: None,
        }
    }

    fn refuse(reason: impl Into<String>) -> Self {
        Self {
            can_accept: false,
            reason: Some(reason.into()),
        }
    }
}

/// Decides whether a tenant can take on another job right now.
///
/// The check is advisory: it counts at read time and holds no lock, so two
/// concurrent creations can both pass and briefly put a tenant one job
/// over its limit. That window is an accepted limitation; the check exists
/// to keep the counter honest in the steady state, not to serialize
/// admissions.
pub struct CapacityGate {
    tenants: Arc<dyn TenantStore>,
    jobs: Arc<dyn JobStore>,
}

impl CapacityGate {
    pub fn new(tenants: Arc<dyn TenantStore>, jobs: Arc<dyn JobStore>) -> Self {
        Self { tenants, jobs }
    }

    /// Check the tenant's concurrency policy against its active job count.
    /// Active means a status that still occupies a bay (received or work
    /// started); completed, delivered and cancelled jobs do not count.
    pub async fn can_accept_new_job(&self, tenant_id: ResourceId) -> Result<CapacityDecision> {
        let tenant = self
            .tenants
            .get_by_id(tenant_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("tenant {}", tenant_id)))?;

        if !tenant.active {
            return Ok(CapacityDecision::refuse(
                "this business is deactivated and not accepting new jobs",
            ));
        }

        let active = self.jobs.count_active(tenant_id).await?;

        let decision = match tenant.concurrency {
            ConcurrencyPolicy::Single => {
                if active == 0 {
                    CapacityDecision::accept()
                } else {
                    CapacityDecision::refuse(
                        "a job is already in progress; this business takes one job at a time",
                    )
                }
            }
            ConcurrencyPolicy::Multiple { .. } => {
                let limit = tenant.concurrency.effective_limit() as u64;
                if active < limit {
                    CapacityDecision::accept()
                } else {
                    CapacityDecision::refuse(format!(
                        "capacity reached: {} active jobs at a limit of {}",
                        active, limit
                    ))
                }
            }
        };

        Ok(decision)
    }
}
