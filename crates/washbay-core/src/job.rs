//! Job and status definitions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ResourceId;
use crate::service::ServiceSnapshot;

/// Status of a wash job.
///
/// Jobs move forward through `Received -> WorkStarted -> Completed ->
/// Delivered`; `Cancelled` is reachable from any non-terminal status.
/// Older records carried finer-grained in-progress statuses that have
/// since been folded into `WorkStarted`; those labels only survive inside
/// historical log entries (see [`StatusEntry`]) and are never written
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Received,
    WorkStarted,
    Completed,
    Delivered,
    Cancelled,
}

impl JobStatus {
    /// Position in the forward order, or `None` for `Cancelled` which sits
    /// outside it.
    pub fn forward_position(&self) -> Option<usize> {
        match self {
            JobStatus::Received => Some(0),
            JobStatus::WorkStarted => Some(1),
            JobStatus::Completed => Some(2),
            JobStatus::Delivered => Some(3),
            JobStatus::Cancelled => None,
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Delivered | JobStatus::Cancelled)
    }

    /// Whether a job in this status occupies one of the tenant's
    /// concurrent slots. A completed job is still waiting for pickup but
    /// no longer ties up a bay.
    pub fn counts_against_capacity(&self) -> bool {
        matches!(self, JobStatus::Received | JobStatus::WorkStarted)
    }

    /// The label written to storage and into history entries.
    pub fn as_label(&self) -> &'static str {
        match self {
            JobStatus::Received => "RECEIVED",
            JobStatus::WorkStarted => "WORK_STARTED",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Delivered => "DELIVERED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parse a stored label. Retired in-progress labels map to
    /// `WorkStarted`; this is what the one-time status fold relies on.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "RECEIVED" => Some(JobStatus::Received),
            "WORK_STARTED" => Some(JobStatus::WorkStarted),
            "IN_PROGRESS" | "WASHING" | "DRYING" => Some(JobStatus::WorkStarted),
            "COMPLETED" => Some(JobStatus::Completed),
            "DELIVERED" => Some(JobStatus::Delivered),
            "CANCELLED" => Some(JobStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// One entry in a job's append-only status log.
///
/// The status is kept as the raw label that was current when the entry was
/// written, so logs predating the status fold read back untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: String,
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

/// A wash job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier.
    pub id: ResourceId,
    /// Tenant this job belongs to.
    pub tenant_id: ResourceId,
    pub customer_id: ResourceId,
    pub vehicle_id: ResourceId,
    /// Human-readable ticket identifier, unique within the tenant.
    pub token_number: String,
    /// Current status. The last history entry always carries this label.
    pub status: JobStatus,
    /// Price snapshots of the selected services.
    pub services: Vec<ServiceSnapshot>,
    /// Sum of the snapshot prices, fixed at creation.
    pub total_price: Decimal,
    pub estimated_delivery: Option<DateTime<Utc>>,
    /// Set exactly once, when the job is delivered.
    pub actual_delivery: Option<DateTime<Utc>>,
    /// Append-only status log; never shorter than one entry.
    pub status_history: Vec<StatusEntry>,
    pub before_images: Vec<String>,
    pub after_images: Vec<String>,
    /// Employee the job is assigned to, if any. Restricted roles may only
    /// touch jobs assigned to them.
    pub assigned_to: Option<ResourceId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Append a status entry and move the job to `status`.
    ///
    /// This is the only way the status field changes after construction;
    /// callers validate the transition first.
    pub fn record_status(&mut self, status: JobStatus, note: Option<String>, at: DateTime<Utc>) {
        self.status_history.push(StatusEntry {
            status: status.as_label().to_string(),
            note,
            at,
        });
        self.status = status;
        self.updated_at = at;
    }
}
