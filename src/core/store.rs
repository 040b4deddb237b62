//! Storage traits for tenants and payments
//!
//! Implementations are agnostic to the underlying document store. The one
//! guarantee every implementation must give is that `(tenant_id, month)` is
//! unique across payments, enforced atomically by the store itself.

use crate::core::model::{Payment, Tenant};
use crate::core::month::MonthKey;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The `(tenant, month)` unique constraint was violated
    #[error("payment for tenant {tenant_id} and month {month} already exists")]
    DuplicatePayment { tenant_id: Uuid, month: MonthKey },

    /// A payment referenced a tenant that does not exist
    #[error("tenant {tenant_id} does not exist")]
    MissingTenant { tenant_id: Uuid },

    /// The backend could not be reached
    #[error("failed to connect to {backend}: {message}")]
    Connection {
        backend: &'static str,
        message: String,
    },

    /// A multi-document transaction could not be committed
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// Any other backend failure
    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Filter for payment queries; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    pub tenant_id: Option<Uuid>,
    pub month: Option<MonthKey>,
}

impl PaymentFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_tenant(tenant_id: Uuid) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            month: None,
        }
    }

    pub fn with_month(mut self, month: Option<MonthKey>) -> Self {
        self.month = month;
        self
    }

    pub fn matches(&self, payment: &Payment) -> bool {
        self.tenant_id.is_none_or(|id| payment.tenant_id == id)
            && self.month.as_ref().is_none_or(|m| &payment.month == m)
    }
}

/// Tenant collection
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Insert a new tenant
    async fn insert_tenant(&self, tenant: Tenant) -> StoreResult<Tenant>;

    /// Get a tenant by id
    async fn get_tenant(&self, id: &Uuid) -> StoreResult<Option<Tenant>>;

    /// List all tenants, oldest first
    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>>;

    /// Replace a stored tenant, returning `None` if it does not exist
    async fn replace_tenant(&self, tenant: Tenant) -> StoreResult<Option<Tenant>>;

    /// Delete a tenant together with all of its payments
    ///
    /// Returns `None` if the tenant did not exist, otherwise the number of
    /// payments removed alongside it.
    async fn delete_tenant_cascade(&self, id: &Uuid) -> StoreResult<Option<u64>>;
}

/// Payment collection
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Insert a new payment
    ///
    /// Fails with [`StoreError::DuplicatePayment`] if the `(tenant, month)`
    /// slot is taken.
    async fn insert_payment(&self, payment: Payment) -> StoreResult<Payment>;

    /// Get a payment by id
    async fn get_payment(&self, id: &Uuid) -> StoreResult<Option<Payment>>;

    /// Find payments matching a filter
    async fn find_payments(&self, filter: &PaymentFilter) -> StoreResult<Vec<Payment>>;

    /// Replace a stored payment, returning `None` if it does not exist
    ///
    /// Fails with [`StoreError::MissingTenant`] if the tenant it now points at
    /// is gone, and with [`StoreError::DuplicatePayment`] if the new
    /// `(tenant, month)` belongs to another payment.
    async fn replace_payment(&self, payment: Payment) -> StoreResult<Option<Payment>>;

    /// Delete a payment, returning whether it existed
    async fn delete_payment(&self, id: &Uuid) -> StoreResult<bool>;
}

/// A store holding both collections
pub trait RentStore: TenantStore + PaymentStore {}

impl<T: TenantStore + PaymentStore> RentStore for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches() {
        let tenant = Uuid::new_v4();
        let sept = MonthKey::parse("2025-09").unwrap();
        let payment = Payment::new(tenant, sept.clone(), 10.0, None);

        assert!(PaymentFilter::all().matches(&payment));
        assert!(PaymentFilter::for_tenant(tenant).matches(&payment));
        assert!(!PaymentFilter::for_tenant(Uuid::new_v4()).matches(&payment));
        assert!(
            PaymentFilter::all()
                .with_month(Some(sept))
                .matches(&payment)
        );
        assert!(
            !PaymentFilter::for_tenant(tenant)
                .with_month(Some(MonthKey::parse("2025-10").unwrap()))
                .matches(&payment)
        );
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::DuplicatePayment {
            tenant_id: Uuid::nil(),
            month: MonthKey::parse("2025-09").unwrap(),
        };
        assert!(err.to_string().contains("2025-09"));
    }
}
