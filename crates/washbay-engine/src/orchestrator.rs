//! Job orchestration: creation and status updates.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{info, warn};

use washbay_config::Settings;
use washbay_core::customer::Customer;
use washbay_core::job::{Job, JobStatus};
use washbay_core::notify::{NotificationDispatcher, TemplateRef};
use washbay_core::service::ServiceSnapshot;
use washbay_core::store::{CustomerStore, JobStore, ServiceStore, TenantStore, VehicleStore};
use washbay_core::template::render_template;
use washbay_core::{Error, ResourceId, Result};

use crate::capacity::CapacityGate;
use crate::lifecycle;
use crate::token::TokenAllocator;

/// Input for [`JobOrchestrator::create_job`].
#[derive(Debug, Clone)]
pub struct CreateJobRequest {
    pub customer_id: ResourceId,
    pub vehicle_id: ResourceId,
    pub service_ids: Vec<ResourceId>,
    /// Photos taken at intake.
    pub before_images: Vec<String>,
    /// Explicit delivery estimate. When absent the estimate is derived
    /// from the selected services' handling times.
    pub estimated_delivery: Option<DateTime<Utc>>,
    /// Employee the job is assigned to, if known at intake.
    pub assigned_to: Option<ResourceId>,
}

/// Composes the capacity gate, token allocator and lifecycle machine with
/// ownership validation and customer notifications.
pub struct JobOrchestrator {
    tenants: Arc<dyn TenantStore>,
    customers: Arc<dyn CustomerStore>,
    vehicles: Arc<dyn VehicleStore>,
    services: Arc<dyn ServiceStore>,
    jobs: Arc<dyn JobStore>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    gate: CapacityGate,
    tokens: TokenAllocator,
    settings: Settings,
}

impl JobOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenants: Arc<dyn TenantStore>,
        customers: Arc<dyn CustomerStore>,
        vehicles: Arc<dyn VehicleStore>,
        services: Arc<dyn ServiceStore>,
        jobs: Arc<dyn JobStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        settings: Settings,
    ) -> Self {
        let gate = CapacityGate::new(tenants.clone(), jobs.clone());
        let tokens = TokenAllocator::new(jobs.clone(), &settings.engine);
        Self {
            tenants,
            customers,
            vehicles,
            services,
            jobs,
            dispatcher,
            gate,
            tokens,
            settings,
        }
    }

    /// Create a job for a tenant.
    ///
    /// Every step up to the insert is a hard precondition: capacity,
    /// customer and vehicle ownership, and a full resolution of the
    /// requested services — a single inactive or foreign service rejects
    /// the whole batch, no partial job is ever created. The insert itself
    /// runs in a bounded retry loop: when two requests race to the same
    /// token the storage constraint rejects one, which regenerates and
    /// tries again with fresh jitter.
    pub async fn create_job(
        &self,
        tenant_id: ResourceId,
        request: CreateJobRequest,
    ) -> Result<Job> {
        let decision = self.gate.can_accept_new_job(tenant_id).await?;
        if !decision.can_accept {
            return Err(Error::CapacityExceeded(
                decision.reason.unwrap_or_else(|| "tenant is at capacity".to_string()),
            ));
        }

        let customer = self
            .customers
            .get_for_tenant(tenant_id, request.customer_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("customer {}", request.customer_id)))?;

        let vehicle = self
            .vehicles
            .get_for_tenant(tenant_id, request.vehicle_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("vehicle {}", request.vehicle_id)))?;
        if vehicle.customer_id != customer.id {
            return Err(Error::NotFound(format!(
                "vehicle {} does not belong to customer {}",
                vehicle.id, customer.id
            )));
        }

        if request.service_ids.is_empty() {
            return Err(Error::Validation(
                "a job needs at least one service".to_string(),
            ));
        }
        let services = self
            .services
            .find_active_by_ids(tenant_id, &request.service_ids)
            .await?;
        if services.len() != request.service_ids.len() {
            return Err(Error::Validation(format!(
                "requested {} services but only {} are active for this business",
                request.service_ids.len(),
                services.len()
            )));
        }

        let snapshots: Vec<ServiceSnapshot> =
            services.iter().map(ServiceSnapshot::of).collect();
        let total_price: Decimal = snapshots.iter().map(|s| s.price).sum();

        let now = Utc::now();
        let estimated_delivery = match request.estimated_delivery {
            Some(explicit) => {
                if explicit <= now {
                    return Err(Error::Validation(
                        "estimated delivery must lie in the future".to_string(),
                    ));
                }
                Some(explicit)
            }
            None => {
                let minutes: i64 = services.iter().map(|s| s.max_minutes).sum();
                Some(now + chrono::Duration::minutes(minutes))
            }
        };

        let mut job = Job {
            id: ResourceId::new(),
            tenant_id,
            customer_id: customer.id,
            vehicle_id: vehicle.id,
            token_number: String::new(),
            status: JobStatus::Received,
            services: snapshots,
            total_price,
            estimated_delivery,
            actual_delivery: None,
            status_history: Vec::new(),
            before_images: request.before_images,
            after_images: Vec::new(),
            assigned_to: request.assigned_to,
            created_at: now,
            updated_at: now,
        };
        job.record_status(JobStatus::Received, None, now);

        let job = self.insert_with_token_retry(job).await?;
        info!(
            tenant_id = %tenant_id,
            job_id = %job.id,
            token = %job.token_number,
            "job created"
        );

        self.notify(&customer, &job, TemplateRef::JobReceived).await;

        Ok(job)
    }

    /// Move a job to a new status.
    ///
    /// `acting_employee` scopes the lookup for restricted roles: when set,
    /// only a job assigned to that employee is visible. Supplied
    /// after-images are attached before the transition runs, so a delivery
    /// request may carry its own photos.
    pub async fn update_job_status(
        &self,
        tenant_id: ResourceId,
        job_id: ResourceId,
        requested: JobStatus,
        note: Option<String>,
        after_images: Vec<String>,
        acting_employee: Option<ResourceId>,
    ) -> Result<Job> {
        let mut job = self
            .jobs
            .find_by_id(tenant_id, job_id, acting_employee)
            .await?
            .ok_or_else(|| Error::NotFound(format!("job {}", job_id)))?;

        job.after_images.extend(after_images);

        lifecycle::apply_transition(
            &mut job,
            requested,
            note,
            Utc::now(),
            self.settings.engine.min_delivery_images,
        )?;

        self.jobs.save(&job).await?;
        info!(
            tenant_id = %tenant_id,
            job_id = %job.id,
            status = %job.status,
            "job status updated"
        );

        match self.customers.get_for_tenant(tenant_id, job.customer_id).await {
            Ok(Some(customer)) => {
                self.notify(&customer, &job, TemplateRef::StatusChanged).await;
            }
            Ok(None) => {
                warn!(job_id = %job.id, "customer missing, skipping status notification");
            }
            Err(e) => {
                warn!(job_id = %job.id, error = %e, "customer lookup failed, skipping status notification");
            }
        }

        Ok(job)
    }

    /// Insert the job, regenerating the token on duplicate-token rejections.
    ///
    /// Bounded by the configured attempt budget with a small randomized
    /// backoff between attempts. Only [`Error::DuplicateToken`] is
    /// retried; any other failure propagates immediately.
    async fn insert_with_token_retry(&self, mut job: Job) -> Result<Job> {
        let attempts = self.settings.engine.create_attempts;
        let backoff_max = self.settings.engine.backoff_max_ms;

        for attempt in 1..=attempts {
            job.token_number = self.tokens.generate(job.tenant_id).await?;

            match self.jobs.insert(&job).await {
                Ok(()) => return Ok(job),
                Err(Error::DuplicateToken(msg)) => {
                    warn!(
                        tenant_id = %job.tenant_id,
                        token = %job.token_number,
                        attempt,
                        "duplicate token on insert, regenerating: {msg}"
                    );
                    // No point backing off when there is no next attempt.
                    if attempt < attempts {
                        let jitter = {
                            let mut rng = rand::thread_rng();
                            rng.gen_range(0..=backoff_max)
                        };
                        tokio::time::sleep(Duration::from_millis(jitter)).await;
                    }
                }
                Err(other) => return Err(other),
            }
        }

        Err(Error::Exhausted(format!(
            "could not insert job for tenant {} after {} attempts",
            job.tenant_id, attempts
        )))
    }

    /// Render and dispatch a notification. Fire-and-forget: any failure is
    /// logged and swallowed, a lost message never fails the operation that
    /// produced it.
    async fn notify(&self, customer: &Customer, job: &Job, template: TemplateRef) {
        let business = match self.tenants.get_by_id(job.tenant_id).await {
            Ok(Some(tenant)) => tenant.name,
            _ => String::new(),
        };

        let mut vars: HashMap<&str, String> = HashMap::new();
        vars.insert("customer", customer.name.clone());
        vars.insert("business", business);
        vars.insert("token", job.token_number.clone());
        vars.insert("status", job.status.to_string());
        if let Some(eta) = job.estimated_delivery {
            vars.insert("eta", eta.format("%Y-%m-%d %H:%M UTC").to_string());
        }

        let body = match template {
            TemplateRef::JobReceived => &self.settings.notifications.job_received,
            TemplateRef::StatusChanged => &self.settings.notifications.status_changed,
        };
        let message = render_template(body, &vars);

        match self.dispatcher.send(&customer.phone, &message, template).await {
            Ok(outcome) if outcome.success => {}
            Ok(outcome) => warn!(
                job_id = %job.id,
                ?template,
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "notification dispatch reported failure"
            ),
            Err(e) => warn!(
                job_id = %job.id,
                ?template,
                error = %e,
                "notification dispatch failed"
            ),
        }
    }
}
