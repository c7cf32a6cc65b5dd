//! Vehicle definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ResourceId;

/// A vehicle registered by a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: ResourceId,
    pub tenant_id: ResourceId,
    /// Owning customer. Jobs may only pair a vehicle with this customer.
    pub customer_id: ResourceId,
    /// Licence plate as entered at the counter.
    pub plate: String,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
