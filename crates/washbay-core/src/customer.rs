//! Customer definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ResourceId;

/// A customer of one tenant. Customers are not shared across tenants; the
/// same person at two businesses is two records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: ResourceId,
    pub tenant_id: ResourceId,
    pub name: String,
    /// Messaging handle notifications are delivered to.
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
