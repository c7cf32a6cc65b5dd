//! Service catalog definitions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ResourceId;

/// A catalog entry a tenant offers (wash, polish, detailing, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ResourceId,
    pub tenant_id: ResourceId,
    pub name: String,
    /// Current list price. Jobs snapshot this at creation time.
    pub price: Decimal,
    /// Upper handling-time estimate in minutes, used to derive a job's
    /// estimated delivery.
    pub max_minutes: i64,
    /// Inactive services stay in the catalog for history but cannot be
    /// added to new jobs.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Price snapshot a job keeps for each selected service. Later catalog
/// edits never re-price an existing job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    pub service_id: ResourceId,
    pub price: Decimal,
}

impl ServiceSnapshot {
    pub fn of(service: &Service) -> Self {
        Self {
            service_id: service.id,
            price: service.price,
        }
    }
}
