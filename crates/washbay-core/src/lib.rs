//! Core domain types and traits for the WashBay car-wash platform.
//!
//! This crate contains:
//! - Resource identifiers and common types
//! - Tenant, customer, vehicle and service definitions
//! - Job, status and status-history types
//! - Store traits implemented by the persistence layer
//! - The notification dispatcher seam and message templating

pub mod customer;
pub mod error;
pub mod id;
pub mod job;
pub mod notify;
pub mod service;
pub mod store;
pub mod template;
pub mod tenant;
pub mod vehicle;

pub use error::{Error, Result};
pub use id::ResourceId;
