//! Core module containing the domain types, rules and storage contracts

pub mod entity;
pub mod error;
pub mod ledger;
pub mod model;
pub mod month;
pub mod store;
pub mod validation;

pub use entity::Entity;
pub use error::{AppError, AppResult};
pub use model::{Payment, PaymentStatus, PaymentView, Tenant, TenantSummary};
pub use month::MonthKey;
pub use store::{PaymentFilter, PaymentStore, RentStore, StoreError, StoreResult, TenantStore};
