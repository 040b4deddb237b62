use crate::core::error::{AppError, AppResult};
use crate::core::model::Tenant;
use crate::core::store::RentStore;
use crate::core::validation::{NewTenant, TenantPatch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const TENANT_DELETED_MESSAGE: &str = "Tenant and associated payments deleted successfully";

/// Response body for a tenant deletion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantDeleted {
    pub message: String,
    pub deleted_payments: u64,
}

/// Tenant CRUD on top of a [`RentStore`]
#[derive(Clone)]
pub struct TenantService {
    store: Arc<dyn RentStore>,
}

impl TenantService {
    pub fn new(store: Arc<dyn RentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Tenant>> {
        Ok(self.store.list_tenants().await?)
    }

    pub async fn create(&self, input: NewTenant) -> AppResult<Tenant> {
        let tenant = input.validate()?;
        let tenant = self.store.insert_tenant(tenant).await?;
        tracing::info!(tenant_id = %tenant.id, flat_no = %tenant.flat_no, "tenant created");
        Ok(tenant)
    }

    pub async fn get(&self, id: &Uuid) -> AppResult<Tenant> {
        self.store
            .get_tenant(id)
            .await?
            .ok_or_else(|| AppError::tenant_not_found(*id))
    }

    /// Apply a partial update, validated with the same rules as creation
    pub async fn update(&self, id: &Uuid, patch: TenantPatch) -> AppResult<Tenant> {
        let mut tenant = self.get(id).await?;
        patch.apply(&mut tenant)?;

        let tenant = self
            .store
            .replace_tenant(tenant)
            .await?
            .ok_or_else(|| AppError::tenant_not_found(*id))?;
        tracing::info!(tenant_id = %id, "tenant updated");
        Ok(tenant)
    }

    /// Delete a tenant and every payment recorded against it
    pub async fn delete(&self, id: &Uuid) -> AppResult<TenantDeleted> {
        let deleted_payments = self
            .store
            .delete_tenant_cascade(id)
            .await?
            .ok_or_else(|| AppError::tenant_not_found(*id))?;

        tracing::info!(tenant_id = %id, deleted_payments, "tenant deleted");
        Ok(TenantDeleted {
            message: TENANT_DELETED_MESSAGE.to_string(),
            deleted_payments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{EntityError, ValidationError};
    use crate::core::model::Payment;
    use crate::core::month::MonthKey;
    use crate::core::store::{PaymentFilter, PaymentStore, TenantStore};
    use crate::storage::InMemoryStore;

    fn setup() -> (TenantService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (TenantService::new(store.clone()), store)
    }

    fn new_tenant(rent: f64) -> NewTenant {
        NewTenant {
            name: Some("A".to_string()),
            phone: Some("555-0100".to_string()),
            flat_no: Some("101".to_string()),
            rent_amount: Some(rent),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (service, _) = setup();
        let created = service.create(new_tenant(1000.0)).await.unwrap();

        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_zero_rent_allowed_negative_rejected() {
        let (service, _) = setup();
        assert!(service.create(new_tenant(0.0)).await.is_ok());

        let err = service.create(new_tenant(-1.0)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::FieldError { .. })));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let (service, _) = setup();
        let err = service.get(&Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Entity(EntityError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_validates_like_create() {
        let (service, _) = setup();
        let tenant = service.create(new_tenant(1000.0)).await.unwrap();

        let bad = TenantPatch {
            rent_amount: Some(-10.0),
            ..Default::default()
        };
        assert!(service.update(&tenant.id, bad).await.is_err());
        assert_eq!(service.get(&tenant.id).await.unwrap().rent_amount, 1000.0);

        let good = TenantPatch {
            rent_amount: Some(1200.0),
            ..Default::default()
        };
        let updated = service.update(&tenant.id, good).await.unwrap();
        assert_eq!(updated.rent_amount, 1200.0);
        assert_eq!(updated.name, "A");
        assert!(updated.updated_at >= tenant.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let (service, _) = setup();
        let err = service
            .update(&Uuid::new_v4(), TenantPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "TENANT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_reports_removed_payments() {
        let (service, store) = setup();
        let tenant = service.create(new_tenant(1000.0)).await.unwrap();
        for m in ["2025-08", "2025-09"] {
            store
                .insert_payment(Payment::new(
                    tenant.id,
                    MonthKey::parse(m).unwrap(),
                    1000.0,
                    None,
                ))
                .await
                .unwrap();
        }

        let deleted = service.delete(&tenant.id).await.unwrap();
        assert_eq!(deleted.deleted_payments, 2);
        assert_eq!(deleted.message, TENANT_DELETED_MESSAGE);
        assert!(
            store
                .find_payments(&PaymentFilter::for_tenant(tenant.id))
                .await
                .unwrap()
                .is_empty()
        );

        let err = service.delete(&tenant.id).await.unwrap_err();
        assert_eq!(err.error_code(), "TENANT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_reads_through_store() {
        let (service, store) = setup();
        store
            .insert_tenant(Tenant::new("Z".to_string(), None, "9".to_string(), 1.0))
            .await
            .unwrap();
        assert_eq!(service.list().await.unwrap()[0].name, "Z");
    }
}
