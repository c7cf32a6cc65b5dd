//! PostgreSQL store implementations.

pub mod customer;
pub mod job;
pub mod service;
pub mod tenant;
pub mod vehicle;

pub use customer::PgCustomerStore;
pub use job::PgJobStore;
pub use service::PgServiceStore;
pub use tenant::PgTenantStore;
pub use vehicle::PgVehicleStore;
