//! Application services for tenants, payments and the dashboard
//!
//! Services own the request-level rules (validation, existence checks,
//! error mapping) and delegate persistence to a shared [`RentStore`].
//!
//! [`RentStore`]: crate::core::store::RentStore

pub mod dashboard;
pub mod payments;
pub mod tenants;

pub use dashboard::DashboardService;
pub use payments::{PaymentDeleted, PaymentService};
pub use tenants::{TenantDeleted, TenantService};
