//! In-memory stores and a recording dispatcher for the engine tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use washbay_core::customer::Customer;
use washbay_core::job::{Job, JobStatus};
use washbay_core::notify::{DispatchOutcome, NotificationDispatcher, TemplateRef};
use washbay_core::service::Service;
use washbay_core::store::{CustomerStore, JobStore, ServiceStore, TenantStore, VehicleStore};
use washbay_core::tenant::{ConcurrencyPolicy, Tenant};
use washbay_core::vehicle::Vehicle;
use washbay_core::{Error, ResourceId, Result};

/// One in-memory backend implementing every store trait, so a single
/// `Arc<MemBackend>` can be cloned into each seam of the engine.
#[derive(Default)]
pub(crate) struct MemBackend {
    tenants: Mutex<Vec<Tenant>>,
    customers: Mutex<Vec<Customer>>,
    vehicles: Mutex<Vec<Vehicle>>,
    services: Mutex<Vec<Service>>,
    jobs: Mutex<Vec<Job>>,
    /// Pending inserts to reject with a duplicate-token error, simulating
    /// a concurrent request winning the unique constraint.
    duplicate_failures: AtomicU32,
}

impl MemBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_tenant(&self, tenant: Tenant) {
        self.tenants.lock().unwrap().push(tenant);
    }

    pub fn add_customer(&self, customer: Customer) {
        self.customers.lock().unwrap().push(customer);
    }

    pub fn add_vehicle(&self, vehicle: Vehicle) {
        self.vehicles.lock().unwrap().push(vehicle);
    }

    pub fn add_service(&self, service: Service) {
        self.services.lock().unwrap().push(service);
    }

    pub fn add_job(&self, job: Job) {
        self.jobs.lock().unwrap().push(job);
    }

    pub fn job_count(&self, tenant_id: ResourceId) -> usize {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.tenant_id == tenant_id)
            .count()
    }

    pub fn fail_inserts_with_duplicate(&self, count: u32) {
        self.duplicate_failures.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl TenantStore for MemBackend {
    async fn get_by_id(&self, id: ResourceId) -> Result<Option<Tenant>> {
        Ok(self
            .tenants
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }
}

#[async_trait]
impl CustomerStore for MemBackend {
    async fn get_for_tenant(
        &self,
        tenant_id: ResourceId,
        id: ResourceId,
    ) -> Result<Option<Customer>> {
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id && c.tenant_id == tenant_id)
            .cloned())
    }
}

#[async_trait]
impl VehicleStore for MemBackend {
    async fn get_for_tenant(
        &self,
        tenant_id: ResourceId,
        id: ResourceId,
    ) -> Result<Option<Vehicle>> {
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id && v.tenant_id == tenant_id)
            .cloned())
    }
}

#[async_trait]
impl ServiceStore for MemBackend {
    async fn find_active_by_ids(
        &self,
        tenant_id: ResourceId,
        ids: &[ResourceId],
    ) -> Result<Vec<Service>> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.tenant_id == tenant_id && s.active && ids.contains(&s.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl JobStore for MemBackend {
    async fn count_active(&self, tenant_id: ResourceId) -> Result<u64> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.tenant_id == tenant_id && j.status.counts_against_capacity())
            .count() as u64)
    }

    async fn token_exists(&self, tenant_id: ResourceId, token: &str) -> Result<bool> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .any(|j| j.tenant_id == tenant_id && j.token_number == token))
    }

    async fn insert(&self, job: &Job) -> Result<()> {
        if self
            .duplicate_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(Error::DuplicateToken(format!(
                "token {} already exists for tenant {}",
                job.token_number, job.tenant_id
            )));
        }

        let mut jobs = self.jobs.lock().unwrap();
        if jobs
            .iter()
            .any(|j| j.tenant_id == job.tenant_id && j.token_number == job.token_number)
        {
            return Err(Error::DuplicateToken(format!(
                "token {} already exists for tenant {}",
                job.token_number, job.tenant_id
            )));
        }
        jobs.push(job.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        tenant_id: ResourceId,
        job_id: ResourceId,
        assigned_to: Option<ResourceId>,
    ) -> Result<Option<Job>> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| {
                j.id == job_id
                    && j.tenant_id == tenant_id
                    && assigned_to.is_none_or(|emp| j.assigned_to == Some(emp))
            })
            .cloned())
    }

    async fn save(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.iter_mut().find(|j| j.id == job.id) {
            Some(slot) => {
                *slot = job.clone();
                Ok(())
            }
            None => Err(Error::NotFound(format!("job {}", job.id))),
        }
    }
}

/// A message captured by [`RecordingDispatcher`].
#[derive(Debug, Clone)]
pub(crate) struct SentMessage {
    #[allow(dead_code)]
    pub recipient: String,
    pub message: String,
    #[allow(dead_code)]
    pub template: TemplateRef,
}

/// Dispatcher that records messages instead of delivering them, and can be
/// flipped into a failure mode.
#[derive(Default)]
pub(crate) struct RecordingDispatcher {
    messages: Mutex<Vec<SentMessage>>,
    fail: AtomicBool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(
        &self,
        recipient: &str,
        message: &str,
        template: TemplateRef,
    ) -> Result<DispatchOutcome> {
        if self.fail.load(Ordering::SeqCst) {
            return Ok(DispatchOutcome::failed("provider unavailable"));
        }
        self.messages.lock().unwrap().push(SentMessage {
            recipient: recipient.to_string(),
            message: message.to_string(),
            template,
        });
        Ok(DispatchOutcome::ok())
    }
}

pub(crate) fn tenant_with_policy(concurrency: ConcurrencyPolicy) -> Tenant {
    let now = Utc::now();
    Tenant {
        id: ResourceId::new(),
        name: "Sparkle & Shine".to_string(),
        slug: "sparkle-shine".to_string(),
        phone: "+15550100".to_string(),
        concurrency,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn customer_for(tenant_id: ResourceId) -> Customer {
    let now = Utc::now();
    Customer {
        id: ResourceId::new(),
        tenant_id,
        name: "Ada".to_string(),
        phone: "+15550123".to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn vehicle_for(tenant_id: ResourceId, customer_id: ResourceId) -> Vehicle {
    let now = Utc::now();
    Vehicle {
        id: ResourceId::new(),
        tenant_id,
        customer_id,
        plate: "KA-01-AB-1234".to_string(),
        model: Some("hatchback".to_string()),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn service_for(
    tenant_id: ResourceId,
    price: Decimal,
    max_minutes: i64,
    active: bool,
) -> Service {
    let now = Utc::now();
    Service {
        id: ResourceId::new(),
        tenant_id,
        name: "Exterior wash".to_string(),
        price,
        max_minutes,
        active,
        created_at: now,
        updated_at: now,
    }
}

/// A minimal job in the given status with a consistent one-entry history
/// and a unique token.
pub(crate) fn job_with_status(tenant_id: ResourceId, status: JobStatus) -> Job {
    let now = Utc::now();
    let id = ResourceId::new();
    let mut job = Job {
        id,
        tenant_id,
        customer_id: ResourceId::new(),
        vehicle_id: ResourceId::new(),
        token_number: format!("TEST-{}", id),
        status: JobStatus::Received,
        services: Vec::new(),
        total_price: Decimal::ZERO,
        estimated_delivery: None,
        actual_delivery: None,
        status_history: Vec::new(),
        before_images: Vec::new(),
        after_images: Vec::new(),
        assigned_to: None,
        created_at: now,
        updated_at: now,
    };
    job.record_status(status, None, now);
    job
}
