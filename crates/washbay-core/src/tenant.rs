//! Tenant (business) definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, ResourceId, Result};

/// A car-wash business on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique identifier.
    pub id: ResourceId,
    /// Business display name (used in customer-facing messages).
    pub name: String,
    /// URL-safe short name.
    pub slug: String,
    /// Contact phone of the business.
    pub phone: String,
    /// How many wash jobs may run at once.
    pub concurrency: ConcurrencyPolicy,
    /// Inactive tenants keep their data but accept no new jobs.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Concurrency policy of a tenant.
///
/// `Single` means exactly one job may be active at a time, typically a
/// one-bay operation. `Multiple` admits jobs up to a fixed limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConcurrencyPolicy {
    Single,
    Multiple { max_concurrent_jobs: u32 },
}

impl ConcurrencyPolicy {
    /// Build a `Multiple` policy, rejecting limits below 1.
    pub fn multiple(max_concurrent_jobs: u32) -> Result<Self> {
        if max_concurrent_jobs < 1 {
            return Err(Error::Validation(
                "max_concurrent_jobs must be at least 1".to_string(),
            ));
        }
        Ok(Self::Multiple {
            max_concurrent_jobs,
        })
    }

    /// The number of jobs this policy admits at once. A `Single` tenant is
    /// always limited to 1, whatever a stored limit may say.
    pub fn effective_limit(&self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Multiple {
                max_concurrent_jobs,
            } => (*max_concurrent_jobs).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_rejects_zero_limit() {
        assert!(ConcurrencyPolicy::multiple(0).is_err());
        assert!(ConcurrencyPolicy::multiple(1).is_ok());
    }

    #[test]
    fn effective_limit_floors_at_one() {
        assert_eq!(ConcurrencyPolicy::Single.effective_limit(), 1);
        assert_eq!(
            ConcurrencyPolicy::Multiple {
                max_concurrent_jobs: 0
            }
            .effective_limit(),
            1
        );
        assert_eq!(
            ConcurrencyPolicy::Multiple {
                max_concurrent_jobs: 4
            }
            .effective_limit(),
            4
        );
    }
}
