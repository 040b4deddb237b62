//! In-memory implementation of the tenant and payment stores
//!
//! Both collections live behind a single `RwLock`, so the `(tenant, month)`
//! uniqueness check and the tenant cascade each happen under one write guard.

use crate::core::entity::{Entity, sort_oldest_first};
use crate::core::model::{Payment, Tenant};
use crate::core::store::{PaymentFilter, PaymentStore, StoreError, StoreResult, TenantStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    tenants: HashMap<Uuid, Tenant>,
    payments: HashMap<Uuid, Payment>,
}

impl Collections {
    fn slot_taken(&self, payment: &Payment) -> bool {
        self.payments
            .values()
            .any(|p| p.id != payment.id && p.occupies(&payment.tenant_id, &payment.month))
    }

    fn duplicate(payment: &Payment) -> StoreError {
        StoreError::DuplicatePayment {
            tenant_id: payment.tenant_id,
            month: payment.month.clone(),
        }
    }
}

/// In-memory store
///
/// Useful for testing and development. Cloning shares the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.data
            .read()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.data
            .write()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl TenantStore for InMemoryStore {
    async fn insert_tenant(&self, tenant: Tenant) -> StoreResult<Tenant> {
        let mut data = self.write()?;
        data.tenants.insert(tenant.id(), tenant.clone());
        Ok(tenant)
    }

    async fn get_tenant(&self, id: &Uuid) -> StoreResult<Option<Tenant>> {
        Ok(self.read()?.tenants.get(id).cloned())
    }

    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>> {
        let mut tenants: Vec<Tenant> = self.read()?.tenants.values().cloned().collect();
        sort_oldest_first(&mut tenants);
        Ok(tenants)
    }

    async fn replace_tenant(&self, tenant: Tenant) -> StoreResult<Option<Tenant>> {
        let mut data = self.write()?;
        match data.tenants.get_mut(&tenant.id) {
            Some(slot) => {
                *slot = tenant.clone();
                Ok(Some(tenant))
            }
            None => Ok(None),
        }
    }

    async fn delete_tenant_cascade(&self, id: &Uuid) -> StoreResult<Option<u64>> {
        let mut data = self.write()?;
        if data.tenants.remove(id).is_none() {
            return Ok(None);
        }
        let before = data.payments.len();
        data.payments.retain(|_, p| &p.tenant_id != id);
        Ok(Some((before - data.payments.len()) as u64))
    }
}

#[async_trait]
impl PaymentStore for InMemoryStore {
    async fn insert_payment(&self, payment: Payment) -> StoreResult<Payment> {
        let mut data = self.write()?;
        if !data.tenants.contains_key(&payment.tenant_id) {
            return Err(StoreError::MissingTenant {
                tenant_id: payment.tenant_id,
            });
        }
        if data.slot_taken(&payment) {
            return Err(Collections::duplicate(&payment));
        }
        data.payments.insert(payment.id(), payment.clone());
        Ok(payment)
    }

    async fn get_payment(&self, id: &Uuid) -> StoreResult<Option<Payment>> {
        Ok(self.read()?.payments.get(id).cloned())
    }

    async fn find_payments(&self, filter: &PaymentFilter) -> StoreResult<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .read()?
            .payments
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        sort_oldest_first(&mut payments);
        Ok(payments)
    }

    async fn replace_payment(&self, payment: Payment) -> StoreResult<Option<Payment>> {
        let mut data = self.write()?;
        if !data.payments.contains_key(&payment.id) {
            return Ok(None);
        }
        if !data.tenants.contains_key(&payment.tenant_id) {
            return Err(StoreError::MissingTenant {
                tenant_id: payment.tenant_id,
            });
        }
        if data.slot_taken(&payment) {
            return Err(Collections::duplicate(&payment));
        }
        data.payments.insert(payment.id, payment.clone());
        Ok(Some(payment))
    }

    async fn delete_payment(&self, id: &Uuid) -> StoreResult<bool> {
        Ok(self.write()?.payments.remove(id).is_some())
    }
}
