//! Ticket token issuance.
//!
//! Tokens look like `20260101-KXM4T9`: the UTC date, a dash, and a short
//! suffix drawn from an alphabet without visually confusable characters
//! (no 0/O/I/1), so the ticket survives being read over a counter or
//! scribbled on a windshield tag.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::warn;
use washbay_config::EngineSettings;
use washbay_core::store::JobStore;
use washbay_core::{ResourceId, Result};

/// Uppercase letters and digits minus 0, O, I and 1.
const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Issues tenant-unique token numbers.
///
/// The allocator probes the job store to dodge collisions early, but the
/// real guarantee lives in the storage layer's `(tenant_id, token_number)`
/// unique constraint: two concurrent allocations can both draw the same
/// candidate, and exactly one of the subsequent inserts will win. Callers
/// of [`JobStore::insert`] handle the loser.
pub struct TokenAllocator {
    jobs: Arc<dyn JobStore>,
    suffix_length: usize,
    max_attempts: u32,
}

impl TokenAllocator {
    pub fn new(jobs: Arc<dyn JobStore>, settings: &EngineSettings) -> Self {
        Self {
            jobs,
            suffix_length: settings.token_suffix_length,
            max_attempts: settings.token_attempts,
        }
    }

    /// Generate a token not currently taken within the tenant.
    ///
    /// Draws and probes up to the configured attempt budget. With a
    /// 32-character alphabet and a 6-character suffix the space per tenant
    /// per day is about 10^9, so exhausting the budget means something is
    /// deeply wrong with the store; the fallback token then degrades
    /// uniqueness to timestamp resolution rather than failing the request.
    pub async fn generate(&self, tenant_id: ResourceId) -> Result<String> {
        let prefix = Utc::now().format("%Y%m%d").to_string();

        for _ in 0..self.max_attempts {
            let candidate = format!("{}-{}", prefix, random_suffix(self.suffix_length));
            if !self.jobs.token_exists(tenant_id, &candidate).await? {
                return Ok(candidate);
            }
        }

        warn!(
            %tenant_id,
            attempts = self.max_attempts,
            "token draw budget exhausted, falling back to timestamp token"
        );
        Ok(fallback_token(&prefix))
    }
}

fn random_suffix(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Last-resort token: base-36 millisecond timestamp tail plus a short
/// random suffix. Unique per tenant down to timestamp resolution.
fn fallback_token(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    format!("{}-{}{}", prefix, base36_tail(millis, 5), random_suffix(3))
}

fn base36_tail(mut value: i64, digits: usize) -> String {
    const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut out = vec![b'0'; digits];
    for slot in out.iter_mut().rev() {
        *slot = BASE36[(value % 36) as usize];
        value /= 36;
    }
    String::from_utf8(out).unwrap_or_default()
}
