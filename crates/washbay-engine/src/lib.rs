//! Job engine for WashBay.
//!
//! The pieces the rest of the platform builds on:
//! - [`capacity::CapacityGate`] — admission control against a tenant's
//!   concurrency policy
//! - [`token::TokenAllocator`] — human-readable ticket identifiers,
//!   unique per tenant
//! - [`lifecycle`] — the status state machine
//! - [`orchestrator::JobOrchestrator`] — job creation and status updates,
//!   composing the above with validation and customer notifications

pub mod capacity;
pub mod lifecycle;
pub mod orchestrator;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use capacity::{CapacityDecision, CapacityGate};
pub use orchestrator::{CreateJobRequest, JobOrchestrator};
pub use token::TokenAllocator;
